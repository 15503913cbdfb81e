//! Vendor metadata sent with every submission.

use sha2::{Digest, Sha256};
use sysinfo::System;

use crate::config::schema::VendorConfig;

/// Host operating system as reported in `Gov-Vendor-Version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub name: String,
    pub release: String,
}

impl Platform {
    /// Detect the platform this process runs on.
    pub fn detect() -> Self {
        Self {
            name: os_name(std::env::consts::OS),
            release: System::kernel_version().unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

fn os_name(target_os: &str) -> String {
    match target_os {
        "linux" => "Linux".to_string(),
        "macos" => "Darwin".to_string(),
        "windows" => "Windows".to_string(),
        other => other.to_string(),
    }
}

/// Static vendor identity plus the detected platform.
#[derive(Debug, Clone)]
pub struct VendorInfo {
    pub vendor_name: String,
    pub product_name: String,
    pub module_version: String,
    pub platform: Platform,
}

impl VendorInfo {
    pub fn new(config: &VendorConfig, platform: Platform) -> Self {
        Self {
            vendor_name: config.vendor_name.clone(),
            product_name: config.product_name.clone(),
            module_version: config.module_version.clone(),
            platform,
        }
    }

    /// `Gov-Vendor-License-IDs` value. The raw GUID never leaves the process.
    pub fn license_ids(&self, installation_guid: &str) -> String {
        format!("{}={}", self.vendor_name, hash_guid(installation_guid))
    }

    /// `Gov-Vendor-Version` value.
    pub fn version(&self) -> String {
        format!(
            "{}&{}={}",
            self.module_version, self.platform.name, self.platform.release
        )
    }
}

/// Hex-encoded SHA-256 of the installation GUID.
pub fn hash_guid(guid: &str) -> String {
    hex::encode(Sha256::digest(guid.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vendor() -> VendorInfo {
        VendorInfo::new(
            &VendorConfig::default(),
            Platform {
                name: "Linux".into(),
                release: "6.1.0".into(),
            },
        )
    }

    #[test]
    fn test_license_ids_deterministic() {
        let v = vendor();
        let first = v.license_ids("G");
        assert_eq!(first, v.license_ids("G"));
        assert_ne!(first, v.license_ids("H"));
        assert_eq!(first, format!("ERPNext={}", hash_guid("G")));
        assert!(!first.ends_with("=G"));
    }

    #[test]
    fn test_hash_is_sha256_hex() {
        assert_eq!(
            hash_guid(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hash_guid("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_version_string() {
        assert_eq!(vendor().version(), "erpnext-mtd-module=1.0&Linux=6.1.0");
    }

    #[test]
    fn test_os_name_mapping() {
        assert_eq!(os_name("linux"), "Linux");
        assert_eq!(os_name("macos"), "Darwin");
        assert_eq!(os_name("freebsd"), "freebsd");
    }
}
