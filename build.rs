use std::{env, fs, path::Path};

const DEFAULT_STORAGE_PREFIX: &str = "donors-app::";
const DEFAULT_DATA_DIR_NAME: &str = ".donors-app";

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let cargo_toml_path = Path::new(&manifest_dir).join("Cargo.toml");
    println!("cargo:rerun-if-changed={}", cargo_toml_path.display());

    let content = fs::read_to_string(&cargo_toml_path)
        .unwrap_or_else(|e| panic!("Failed to read Cargo.toml: {e}"));
    let parsed: toml::Value =
        toml::from_str(&content).unwrap_or_else(|e| panic!("Failed to parse Cargo.toml: {e}"));
    let pkg = parsed
        .get("package")
        .and_then(|p| p.as_table())
        .expect("Cargo.toml missing [package]");

    let field = |key: &str, default: &'static str| -> String {
        pkg.get(key)
            .and_then(|v| v.as_str())
            .unwrap_or(default)
            .to_string()
    };
    let name = field("name", "donor-portal");
    let version = field("version", "0.0.0");
    let description = field("description", "");

    // Optional overrides under [package.metadata.donor-portal]
    let portal_meta = pkg
        .get("metadata")
        .and_then(|m| m.get("donor-portal"))
        .and_then(|m| m.as_table());
    let meta = |key: &str, default: &'static str| -> String {
        portal_meta
            .and_then(|t| t.get(key))
            .and_then(|v| v.as_str())
            .unwrap_or(default)
            .to_string()
    };
    let storage_prefix = meta("storage-prefix", DEFAULT_STORAGE_PREFIX);
    let data_dir_name = meta("data-dir-name", DEFAULT_DATA_DIR_NAME);

    if !storage_prefix.ends_with("::") {
        panic!("storage-prefix must end with '::', got {storage_prefix:?}");
    }

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let dest = Path::new(&out_dir).join("pkg_info.rs");
    let contents = format!(
        r#"pub const PKG_NAME: &str = {name:?};
pub const PKG_VERSION: &str = {version:?};
pub const PKG_DESCRIPTION: &str = {description:?};
pub const STORAGE_PREFIX: &str = {storage_prefix:?};
pub const DATA_DIR_NAME: &str = {data_dir_name:?};
"#
    );
    fs::write(&dest, contents).expect("Failed to write pkg_info.rs");
}
