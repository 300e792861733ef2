/// Check if the process is running as administrator
pub fn is_admin() -> bool {
    use winapi::um::shellapi::IsUserAnAdmin;
    unsafe { IsUserAnAdmin() != 0 }
}
