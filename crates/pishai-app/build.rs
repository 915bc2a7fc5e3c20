use std::path::Path;

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir");
    let workspace_root = Path::new(&manifest_dir)
        .ancestors()
        .nth(2)
        .expect("crate lives under <root>/crates/");
    let version_file = workspace_root.join("VERSION");
    println!("cargo:rerun-if-changed={}", version_file.display());

    let contents = std::fs::read_to_string(&version_file).expect("read VERSION file");
    let version = contents.trim();
    assert!(
        !version.is_empty() && version.split('.').all(|part| part.parse::<u64>().is_ok()),
        "VERSION must hold a dotted numeric version, got `{version}`"
    );

    println!("cargo:rustc-env=PISHAI_VERSION={version}");
}
