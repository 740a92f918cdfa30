//! Android keystore inspection and key.properties generation.
//!
//! This module inspects the keystore a set of credentials points at and
//! generates the key.properties file read by the Gradle build script.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use secrecy::ExposeSecret;
use zeroize::Zeroizing;

use crate::error::{Result, ShipkeyError};
use crate::models::{KeystoreInfo, KeystoreType, SigningCredentials};

use super::loader::{KEY_ALIAS, KEY_PASSWORD, STORE_FILE, STORE_PASSWORD};
use super::properties::escape_property_value;

/// Inspects the keystore file at `path`.
///
/// Only the header is read; the keystore is never opened with its password.
pub fn inspect_keystore(path: &Path) -> Result<KeystoreInfo> {
    if !path.is_file() {
        return Err(ShipkeyError::KeystoreNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut file = fs::File::open(path)?;
    let size_bytes = file.metadata()?.len();

    let mut header = Vec::with_capacity(4);
    (&mut file).take(4).read_to_end(&mut header)?;

    let keystore_type = detect_keystore_type(&header);
    tracing::debug!(
        "Keystore {} is {} ({} bytes)",
        path.display(),
        keystore_type,
        size_bytes
    );

    Ok(KeystoreInfo {
        path: path.to_path_buf(),
        keystore_type,
        size_bytes,
    })
}

/// Detects the keystore type from its magic bytes.
pub fn detect_keystore_type(data: &[u8]) -> KeystoreType {
    // JKS files start with magic bytes 0xFEEDFEED; anything else is
    // treated as PKCS12 (ASN.1 SEQUENCE, 0x30).
    if data.starts_with(&[0xFE, 0xED, 0xFE, 0xED]) {
        return KeystoreType::Jks;
    }

    KeystoreType::Pkcs12
}

/// Generates key.properties content for Flutter/Gradle.
///
/// `storeFile` is written exactly as held by the credentials, so relative
/// paths stay relative to whatever base directory the build resolves them
/// against. Values are escaped, so the file loads back to equal credentials.
pub fn render_key_properties(creds: &SigningCredentials) -> Zeroizing<String> {
    let store_file = creds.keystore_path().to_string_lossy();
    let mut content = Zeroizing::new(String::new());

    for (key, value) in [
        (STORE_PASSWORD, creds.store_password().expose_secret()),
        (KEY_PASSWORD, creds.key_password().expose_secret()),
        (KEY_ALIAS, creds.key_alias()),
        (STORE_FILE, &*store_file),
    ] {
        content.push_str(key);
        content.push('=');
        escape_property_value(value, &mut content);
        content.push('\n');
    }

    content
}

/// Writes a key.properties file.
///
/// Refuses to replace an existing file unless `force` is set. On Unix the
/// file is left readable by its owner only.
pub fn write_key_properties(path: &Path, creds: &SigningCredentials, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ShipkeyError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let content = render_key_properties(creds);

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(content.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    tracing::debug!("Wrote key.properties to {}", path.display());

    Ok(())
}

/// Warn if a property source is readable by group or others (on Unix).
#[cfg(unix)]
pub(crate) fn warn_if_permissive(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = fs::metadata(path) {
        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            tracing::warn!(
                "{} has overly permissive permissions ({:o}). Consider running: chmod 600 {}",
                path.display(),
                mode & 0o777,
                path.display()
            );
        }
    }
}

#[cfg(not(unix))]
pub(crate) fn warn_if_permissive(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::load_signing_credentials;

    #[test]
    fn test_detect_keystore_type_jks() {
        let jks_magic = [0xFE, 0xED, 0xFE, 0xED, 0x00, 0x00, 0x00, 0x02];
        assert_eq!(detect_keystore_type(&jks_magic), KeystoreType::Jks);
    }

    #[test]
    fn test_detect_keystore_type_pkcs12() {
        let pkcs12_start = [0x30, 0x82, 0x01, 0x00];
        assert_eq!(detect_keystore_type(&pkcs12_start), KeystoreType::Pkcs12);
        assert_eq!(detect_keystore_type(&[0xFE]), KeystoreType::Pkcs12);
    }

    #[test]
    fn test_inspect_keystore() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.jks");
        fs::write(&path, [0xFEu8, 0xED, 0xFE, 0xED, 0x00, 0x00, 0x00, 0x02]).unwrap();

        let info = inspect_keystore(&path).unwrap();
        assert_eq!(info.keystore_type, KeystoreType::Jks);
        assert_eq!(info.size_bytes, 8);
        assert_eq!(info.path, path);
    }

    #[test]
    fn test_inspect_missing_keystore() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.jks");

        let err = inspect_keystore(&path).unwrap_err();
        assert!(matches!(err, ShipkeyError::KeystoreNotFound { .. }));
    }

    #[test]
    fn test_render_key_properties() {
        let creds = SigningCredentials::new("/path/to/keystore.jks", "storepass", "myalias", "keypass");
        let content = render_key_properties(&creds);

        assert!(content.contains("storePassword=storepass"));
        assert!(content.contains("keyPassword=keypass"));
        assert!(content.contains("keyAlias=myalias"));
        assert!(content.contains("storeFile=/path/to/keystore.jks"));
    }

    #[test]
    fn test_written_file_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("android/key.properties");
        let creds = SigningCredentials::new("upload.jks", "p1", "upload", "p2");

        write_key_properties(&path, &creds, false).unwrap();
        let loaded = load_signing_credentials(&path, Path::new("")).unwrap();

        assert_eq!(loaded, creds);
    }

    #[test]
    fn test_render_escapes_special_characters() {
        let creds = SigningCredentials::new("a.jks", "abc\\", " k=y:#", "p2");
        let content = render_key_properties(&creds);

        assert!(content.contains("storePassword=abc\\\\\n"));
        assert!(content.contains("keyPassword=p2\n"));
        assert!(content.contains("keyAlias=\\ k\\=y\\:\\#\n"));
    }

    #[test]
    fn test_written_file_round_trips_special_characters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.properties");
        let cases = [
            SigningCredentials::new("a.jks", "abc\\", "k1", "p2"),
            SigningCredentials::new("a.jks", "p1 ", "k1", "  p2\t"),
            SigningCredentials::new("a.jks", "a=b:c", "#alias", "!p2"),
            SigningCredentials::new("C:\\keys\\upload.jks", "p1", "k1", "p2"),
            SigningCredentials::new("a.jks", "pässwörd🔑", "k1", "line\nbreak\\"),
        ];

        for creds in cases {
            write_key_properties(&path, &creds, true).unwrap();
            let loaded = load_signing_credentials(&path, Path::new("")).unwrap();
            assert_eq!(loaded, creds, "{:?}", creds);
        }
    }

    #[test]
    fn test_render_is_ascii_only() {
        let creds = SigningCredentials::new("a.jks", "pässwörd🔑", "k1", "p2");
        let content = render_key_properties(&creds);

        assert!(content.is_ascii());
        assert!(content.contains("storePassword=p\\u00E4ssw\\u00F6rd\\uD83D\\uDD11\n"));
    }

    #[test]
    fn test_write_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.properties");
        fs::write(&path, "keyAlias=old\n").unwrap();
        let creds = SigningCredentials::new("a.jks", "p1", "k1", "p2");

        let err = write_key_properties(&path, &creds, false).unwrap_err();
        assert!(matches!(err, ShipkeyError::AlreadyExists { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "keyAlias=old\n");

        write_key_properties(&path, &creds, true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("keyAlias=k1"));
    }

    #[cfg(unix)]
    #[test]
    fn test_written_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("key.properties");
        let creds = SigningCredentials::new("a.jks", "p1", "k1", "p2");

        write_key_properties(&path, &creds, false).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
