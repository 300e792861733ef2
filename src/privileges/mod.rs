//! Privilege checks for physical memory access.
//!
//! Imaging physical memory requires root (Linux/macOS) or Administrator
//! (Windows). Detection only observes, it never tries to elevate; the
//! caller decides whether to refuse or proceed.

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "macos")]
pub mod macos;

/// Check if the process is running with elevated privileges
pub fn is_elevated() -> bool {
    #[cfg(target_os = "windows")]
    {
        windows::is_admin()
    }
    #[cfg(target_os = "linux")]
    {
        linux::is_root()
    }
    #[cfg(target_os = "macos")]
    {
        macos::is_root()
    }
    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        false
    }
}

/// Get instructions for elevating privileges on the current platform
pub fn get_elevation_instructions() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        "Run as Administrator by right-clicking the executable and selecting 'Run as administrator'"
    }
    #[cfg(target_os = "linux")]
    {
        "Run with sudo: 'sudo ./mem-acquire'"
    }
    #[cfg(target_os = "macos")]
    {
        "Run with sudo: 'sudo ./mem-acquire'"
    }
    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        "Run with elevated privileges appropriate for your operating system"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elevation_instructions_are_actionable() {
        let instructions = get_elevation_instructions();
        assert!(!instructions.is_empty());
        assert!(instructions.starts_with("Run"));
    }

    #[test]
    fn test_is_elevated_does_not_panic() {
        // Result depends on how the test process was started.
        let _ = is_elevated();
    }
}
