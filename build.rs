fn main() {
    // Stamp the binary with the build time so `linekit --version` can report it
    let build_date = chrono::Utc::now()
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string();
    println!("cargo:rustc-env=LINEKIT_BUILD_DATE={}", build_date);
}
