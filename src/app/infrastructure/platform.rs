use tracing::debug;

/// Best-effort check of the desktop's dark mode preference.
/// Falls back to `false` (light) when nothing can be detected.
pub fn detect_system_dark_mode() -> bool {
    let detected = query_platform();
    debug!(?detected, "system dark mode detection");
    detected.unwrap_or(false)
}

#[cfg(target_os = "windows")]
fn query_platform() -> Option<bool> {
    use winreg::RegKey;
    use winreg::enums::HKEY_CURRENT_USER;

    let key = RegKey::predef(HKEY_CURRENT_USER)
        .open_subkey("Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize")
        .ok()?;
    // AppsUseLightTheme: 0 = dark, 1 = light
    let light: u32 = key.get_value("AppsUseLightTheme").ok()?;
    Some(light == 0)
}

#[cfg(target_os = "linux")]
fn query_platform() -> Option<bool> {
    let theme = gsettings("gtk-theme");
    let scheme = gsettings("color-scheme");
    if theme.is_none() && scheme.is_none() {
        return None;
    }
    Some(gnome_prefers_dark(
        theme.as_deref().unwrap_or(""),
        scheme.as_deref().unwrap_or(""),
    ))
}

#[cfg(target_os = "linux")]
fn gsettings(key: &str) -> Option<String> {
    let output = std::process::Command::new("gsettings")
        .args(["get", "org.gnome.desktop.interface", key])
        .output()
        .ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(target_os = "macos")]
fn query_platform() -> Option<bool> {
    let output = std::process::Command::new("defaults")
        .args(["read", "-g", "AppleInterfaceStyle"])
        .output()
        .ok()?;
    // The key is absent in light mode, which makes `defaults` exit non-zero
    if !output.status.success() {
        return Some(false);
    }
    Some(String::from_utf8_lossy(&output.stdout).to_lowercase().contains("dark"))
}

#[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
fn query_platform() -> Option<bool> {
    None
}

/// Interpret GNOME's `gtk-theme` and `color-scheme` values.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn gnome_prefers_dark(gtk_theme: &str, color_scheme: &str) -> bool {
    gtk_theme.to_lowercase().contains("dark") || color_scheme.contains("prefer-dark")
}
