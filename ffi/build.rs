use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let out = PathBuf::from(env::var("OUT_DIR").unwrap()).join("ridebook.h");

    let config = cbindgen::Config {
        language: cbindgen::Language::C,
        include_guard: Some("RIDEBOOK_H".to_string()),
        ..Default::default()
    };

    // Header failures are reported, not fatal.
    match cbindgen::Builder::new()
        .with_crate(crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(&out);
        }
        Err(e) => println!("cargo:warning=cbindgen skipped: {e}"),
    }
}
