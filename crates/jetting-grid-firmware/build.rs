fn main() {
    println!("cargo:rerun-if-env-changed=BUILD_VERSION");

    // CI passes a release tag, local builds get stamped with the build time
    let version = std::env::var("BUILD_VERSION")
        .unwrap_or_else(|_| chrono::Local::now().format("%Y.%m.%d-%H%M").to_string());
    println!("cargo:rustc-env=BUILD_VERSION={version}");
}
