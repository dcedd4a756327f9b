pub fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn get_git_commit() -> &'static str {
    env!("GIT_COMMIT_HASH")
}

pub fn get_build_time() -> &'static str {
    env!("BUILD_TIME")
}
