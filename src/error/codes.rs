/// Error code registry for Flowline
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 4000-4999: Execution errors
/// - 6000-6999: Git errors
/// - 7000-7999: Validation and policy errors
/// - 8000-8999: Flow state errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_INVALID_YAML: u16 = 1002;
    pub const CONFIG_INVALID_VALUE: u16 = 1005;
    pub const CONFIG_PATH_ERROR: u16 = 1006;
    pub const CONFIG_VALIDATION_FAILED: u16 = 1008;
    pub const CONFIG_ALREADY_EXISTS: u16 = 1010;

    // Execution errors (4000-4999)
    pub const EXEC_COMMAND_NOT_FOUND: u16 = 4001;
    pub const EXEC_TIMEOUT: u16 = 4002;
    pub const EXEC_SUBPROCESS_FAILED: u16 = 4003;

    // Git errors (6000-6999)
    pub const GIT_GENERIC: u16 = 6000;
    pub const GIT_REPO_NOT_FOUND: u16 = 6001;
    pub const GIT_MERGE_CONFLICT: u16 = 6003;
    pub const GIT_BRANCH_NOT_FOUND: u16 = 6004;
    pub const GIT_DETACHED_HEAD: u16 = 6012;
    pub const GIT_INVALID_REFERENCE: u16 = 6013;

    // Validation errors (7000-7999)
    pub const VALIDATION_INVALID_BRANCH_NAME: u16 = 7004;
    pub const VALIDATION_INVALID_VERSION: u16 = 7005;
    pub const VALIDATION_POLICY_VIOLATION: u16 = 7006;

    // Flow state errors (8000-8999)
    pub const FLOW_PRECONDITION_FAILED: u16 = 8001;
    pub const FLOW_BRANCH_EXISTS: u16 = 8002;
    pub const FLOW_NOT_ON_FLOW_BRANCH: u16 = 8003;
    pub const FLOW_TAG_EXISTS: u16 = 8004;
    pub const FLOW_PARTIAL_SUCCESS: u16 = 8005;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        // Configuration errors
        1000 => "Generic configuration error",
        1001 => "Configuration file not found",
        1002 => "Invalid YAML syntax in configuration",
        1005 => "Invalid value in configuration",
        1006 => "Configuration path error",
        1008 => "Configuration validation failed",
        1010 => "Configuration file already exists",

        // Execution errors
        4001 => "Command not found",
        4002 => "Operation timed out",
        4003 => "Subprocess failed",

        // Git errors
        6000 => "Generic git error",
        6001 => "Git repository not found",
        6003 => "Git merge conflict",
        6004 => "Git branch not found",
        6012 => "Repository is in detached HEAD state",
        6013 => "Unsafe git reference name",

        // Validation errors
        7004 => "Invalid branch name",
        7005 => "Invalid version",
        7006 => "Naming policy violation",

        // Flow state errors
        8001 => "Pre-flight checks failed",
        8002 => "Flow branch already exists",
        8003 => "Not on a flow branch",
        8004 => "Tag already exists",
        8005 => "Operation partially completed; manual steps required",

        _ => "Unknown error code",
    }
}
