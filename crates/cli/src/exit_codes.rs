//! CLI Exit Code Registry
//!
//! Single source of truth for `pgrid` exit codes. Exit codes are part of
//! the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                      |
//! |------|----------------------------------------------|
//! | 0    | Success                                      |
//! | 1    | General error (I/O, malformed document)      |
//! | 2    | Usage error (bad args, refused edit)         |
//! | 3    | Validation errors present / save refused     |
//! | 4    | Scenario is read-only                        |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - I/O failure or malformed document.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unknown row, refused edit.
pub const EXIT_USAGE: u8 = 2;

/// Out-of-range cells exist (validate), or a save was refused on them.
pub const EXIT_VALIDATION: u8 = 3;

/// The selected scenario is read-only; mutation refused.
pub const EXIT_READ_ONLY: u8 = 4;
