//! Instructions-file parsing and validation.
//!
//! The instructions file is three trimmed lines: the server address as
//! `<ipv4>:<port>`, the username to transfer under, and the name of the file
//! to send. Everything is validated here, before any network I/O happens.

use std::{
    fs,
    net::{Ipv4Addr, SocketAddrV4},
    path::Path,
};

use protocol::types::{FILE_NAME_SIZE, USERNAME_SIZE};

use crate::error::{ClientError, ClientResult};

/// One transfer order: where to connect, who we are, what to send.
#[derive(Debug, Clone)]
pub struct Instructions {
    pub server: SocketAddrV4,
    pub username: String,
    pub filename: String,
}

impl Instructions {
    /// Reads and validates the three-line instructions file.
    pub fn load(path: &Path) -> ClientResult<Self> {
        let text = fs::read_to_string(path).map_err(|err| {
            ClientError::Validation(format!(
                "cannot read instructions file {}: {err}",
                path.display()
            ))
        })?;
        let mut lines = text.lines().map(str::trim);

        let server = parse_server(lines.next().ok_or_else(|| missing("server address"))?)?;

        let username = lines.next().ok_or_else(|| missing("username"))?;
        validate_username(username)?;

        let filename = lines.next().ok_or_else(|| missing("file name"))?;
        validate_filename(filename)?;

        Ok(Self {
            server,
            username: username.to_owned(),
            filename: filename.to_owned(),
        })
    }
}

fn missing(what: &str) -> ClientError {
    ClientError::Validation(format!("instructions file is missing the {what} line"))
}

fn parse_server(raw: &str) -> ClientResult<SocketAddrV4> {
    let (addr, port) = raw.split_once(':').ok_or_else(|| {
        ClientError::Validation(format!("server address {raw:?} is not of the form ip:port"))
    })?;
    let addr: Ipv4Addr = addr
        .parse()
        .map_err(|_| ClientError::Validation(format!("{addr:?} is not an IPv4 address")))?;
    let port: u16 = port
        .parse()
        .ok()
        .filter(|&p| p != 0)
        .ok_or_else(|| ClientError::Validation(format!("{port:?} is not a usable port")))?;

    Ok(SocketAddrV4::new(addr, port))
}

/// Usernames travel in a fixed 255-byte field and may only contain ASCII
/// alphanumerics and spaces.
pub fn validate_username(name: &str) -> ClientResult<()> {
    if name.is_empty() || name.len() >= USERNAME_SIZE {
        return Err(ClientError::Validation(format!(
            "username must be 1 to {} characters, got {}",
            USERNAME_SIZE - 1,
            name.len()
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ')
    {
        return Err(ClientError::Validation(format!(
            "username {name:?} may only contain letters, digits and spaces"
        )));
    }
    Ok(())
}

/// File names travel in a fixed 255-byte field.
pub fn validate_filename(name: &str) -> ClientResult<()> {
    if name.is_empty() || name.len() >= FILE_NAME_SIZE {
        return Err(ClientError::Validation(format!(
            "file name must be 1 to {} characters, got {}",
            FILE_NAME_SIZE - 1,
            name.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs, path::PathBuf};

    fn write_instructions(name: &str, content: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("instr_{}_{name}", std::process::id()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn parses_a_valid_file() {
        let path = write_instructions("ok", "127.0.0.1:1234\nalice 42\nreport.pdf\n");
        let instructions = Instructions::load(&path).unwrap();

        assert_eq!(instructions.server, "127.0.0.1:1234".parse().unwrap());
        assert_eq!(instructions.username, "alice 42");
        assert_eq!(instructions.filename, "report.pdf");

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let path = write_instructions("trim", "  10.0.0.1:8080  \n  bob\t\ndata.bin\n");
        let instructions = Instructions::load(&path).unwrap();

        assert_eq!(instructions.server, "10.0.0.1:8080".parse().unwrap());
        assert_eq!(instructions.username, "bob");

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn rejects_non_ipv4_address() {
        let path = write_instructions("addr", "example.com:1234\nbob\ndata.bin\n");
        let err = Instructions::load(&path).unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn rejects_port_zero() {
        let path = write_instructions("port", "127.0.0.1:0\nbob\ndata.bin\n");
        assert!(Instructions::load(&path).is_err());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn rejects_username_with_punctuation() {
        assert!(validate_username("bob!").is_err());
        assert!(validate_username("bob_1").is_err());
        validate_username("bob 1").unwrap();
    }

    #[test]
    fn rejects_oversize_username() {
        let long = "a".repeat(USERNAME_SIZE);
        assert!(validate_username(&long).is_err());
        let just_fits = "a".repeat(USERNAME_SIZE - 1);
        validate_username(&just_fits).unwrap();
    }

    #[test]
    fn rejects_missing_lines() {
        let path = write_instructions("short", "127.0.0.1:1234\nbob\n");
        let err = Instructions::load(&path).unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        fs::remove_file(path).unwrap();
    }
}
