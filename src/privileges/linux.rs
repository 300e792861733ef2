/// Check if the process is running as root
pub fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}
