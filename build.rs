fn main() {
    // Exposes GIT_COMMIT_HASH and friends to the crate through OUT_DIR/built.rs
    if let Err(e) = built::write_built_file() {
        panic!("Failed to acquire build-time information: {e}");
    }
}
