use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::SprigConfig;

/// JSON schema for `sprig.toml`, for editor integration and CI checks.
#[must_use]
pub fn json_schema() -> RootSchema {
    schema_for!(SprigConfig)
}
