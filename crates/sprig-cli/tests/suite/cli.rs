use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const CUSTOMER_SERVICE: &str = r#"package com.example;

import org.springframework.beans.factory.annotation.Autowired;
import org.springframework.beans.factory.annotation.Qualifier;
import org.springframework.stereotype.Service;

@Service
public class CustomerService {
    @Autowired
    @Qualifier("primaryDs")
    private DataSource dataSource;
}
"#;

const ORDER_SERVICE: &str = r#"package com.example;

import org.springframework.stereotype.Service;

@Service
public class OrderService {
}
"#;

const APP_CONFIG: &str = r#"package com.example;

import org.springframework.context.annotation.Bean;
import org.springframework.context.annotation.Configuration;

@Configuration
public class AppConfig {
    @Bean
    public DataSource primaryDs() {
        return null;
    }
}
"#;

fn sprig() -> Command {
    let mut command = Command::new(assert_cmd::cargo::cargo_bin!("sprig"));
    command.env("RUST_LOG", "off");
    command
}

fn shop() -> TempDir {
    let temp = TempDir::new().expect("tempdir");
    let src = temp.child("src/main/java/com/example");
    src.child("CustomerService.java")
        .write_str(CUSTOMER_SERVICE)
        .unwrap();
    src.child("OrderService.java").write_str(ORDER_SERVICE).unwrap();
    src.child("AppConfig.java").write_str(APP_CONFIG).unwrap();
    temp.child("target/Ignored.java")
        .write_str("@org.springframework.stereotype.Component class Ignored {}")
        .unwrap();
    temp.child("sprig.toml")
        .write_str("[logging]\nlevel = \"off\"\nstderr = false\n")
        .unwrap();
    temp
}

#[test]
fn help_mentions_core_commands() {
    sprig().arg("--help").assert().success().stdout(
        predicate::str::contains("index")
            .and(predicate::str::contains("beans"))
            .and(predicate::str::contains("symbols"))
            .and(predicate::str::contains("complete"))
            .and(predicate::str::contains("references"))
            .and(predicate::str::contains("config-schema")),
    );
}

#[test]
fn index_reports_a_summary() {
    let temp = shop();

    let output = sprig()
        .arg("index")
        .arg(temp.path())
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["files"], 3);
    assert_eq!(summary["beans"], 4);
    assert_eq!(summary["failed"], serde_json::json!([]));
}

#[test]
fn beans_can_be_filtered_by_name() {
    let temp = shop();

    sprig()
        .args(["beans", "--name", "orderService", "--path"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("@+ 'orderService' (@Service <: @Component) OrderService")
                .and(predicate::str::contains("customerService").not()),
        );
}

#[test]
fn completions_rank_matching_beans() {
    let temp = shop();

    let output = sprig()
        .args(["complete", "cu", "--json", "--path"])
        .arg(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    let candidates: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = candidates
        .as_array()
        .unwrap()
        .iter()
        .map(|candidate| candidate["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["customerService".to_string()]);
}

#[test]
fn completions_outside_components_are_empty() {
    let temp = shop();
    let pojo = "package com.example;\n\npublic class Receipt {\n    void print() {\n    }\n}\n";
    let file = temp.child("src/main/java/com/example/Receipt.java");
    file.write_str(pojo).unwrap();
    let offset = pojo.find("void print").unwrap();

    let output = sprig()
        .args(["complete", "", "--json", "--offset"])
        .arg(offset.to_string())
        .arg("--file")
        .arg(file.path())
        .arg("--path")
        .arg(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    let candidates: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(candidates, serde_json::json!([]));
}

#[test]
fn references_list_bean_and_qualifier() {
    let temp = shop();

    sprig()
        .args(["references", "primaryDs", "--path"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(
            predicate::str::contains("AppConfig.java:")
                .and(predicate::str::contains("CustomerService.java:10:")),
        );
}

#[test]
fn symbols_are_searched_fuzzily() {
    let temp = shop();

    sprig()
        .args(["symbols", "order", "--path"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("'orderService'"));
}

#[test]
fn invalid_configs_fail_cleanly() {
    let temp = shop();
    temp.child("sprig.toml")
        .write_str("[indexing]\nmax_passes = 0\n")
        .unwrap();

    sprig()
        .arg("index")
        .arg(temp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("indexing.max_passes must be at least 1"));
}

#[test]
fn config_schema_is_json() {
    let output = sprig().arg("config-schema").output().unwrap();
    assert!(output.status.success());

    let schema: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(schema["properties"]["indexing"].is_object());
}
