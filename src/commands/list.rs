//! List commands implementation

use is25flash_core::chip::{Capabilities, ChipProfile};

use crate::cli::TargetArgs;
use crate::programmers;

/// List all compiled-in programmers
pub fn list_programmers() {
    println!("{}", programmers::programmer_help());
}

/// List built-in profiles plus any loaded from `--profile-file`
pub fn list_profiles(target: &TargetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = is25flash_core::chip::ProfileDatabase::new();
    if let Some(path) = &target.profile_file {
        db.load_file(path)?;
    }

    println!(
        "{:<20} {:>10} {:>10} {:>5}  Capabilities",
        "Name", "Size", "JEDEC ID", "UID"
    );
    println!("{}", "-".repeat(72));
    for profile in db.profiles() {
        println!("{}", format_profile(profile));
    }
    Ok(())
}

fn format_profile(profile: &ChipProfile) -> String {
    format!(
        "{:<20} {:>10} {:>10} {:>5}  {}",
        profile.name,
        format_size(profile.total_size),
        profile.jedec_id.to_string(),
        profile.unique_id_len(),
        format_capabilities(profile.capabilities)
    )
}

fn format_capabilities(caps: Capabilities) -> String {
    let names: Vec<&str> = caps.iter_names().map(|(name, _)| name).collect();
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(",")
    }
}

fn format_size(bytes: u32) -> String {
    if bytes >= 1024 * 1024 {
        format!("{} MiB", bytes / (1024 * 1024))
    } else if bytes >= 1024 {
        format!("{} KiB", bytes / 1024)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(32 * 1024 * 1024), "32 MiB");
        assert_eq!(format_size(4096), "4 KiB");
        assert_eq!(format_size(100), "100 B");
    }

    #[test]
    fn test_format_profile() {
        let line = format_profile(&ChipProfile::is25lp256_uid8());
        assert!(line.starts_with("IS25LP256-UID8"));
        assert!(line.contains("32 MiB"));
        assert!(line.contains("9D 60 19"));
        assert!(line.contains("FAST_READ"));
        assert!(!line.contains("STATUS_REG_2"));
    }

    #[test]
    fn test_format_empty_capabilities() {
        assert_eq!(format_capabilities(Capabilities::empty()), "-");
    }

    #[test]
    fn test_bundled_profile_file_loads() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("profiles/is25lp.ron");
        let mut db = is25flash_core::chip::ProfileDatabase::new();
        assert_eq!(db.load_file(&path).unwrap(), 2);

        let sr2 = db.find_by_name("IS25LP256-SR2").unwrap();
        assert!(sr2.has(Capabilities::STATUS_REG_2));
        assert_eq!(db.find_by_name("IS25LP128").unwrap().total_size, 16 * 1024 * 1024);
    }
}
