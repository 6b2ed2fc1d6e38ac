use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::backend::interface::{AccountStore, BackendError, Result};
use crate::core::Account;

/// Keeps the accounts as a pretty-printed JSON array in a single file.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    const INDENT: &'static [u8] = b"    ";

    pub fn new(path: impl AsRef<Path>) -> JsonStore {
        JsonStore { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn to_pretty_json(accounts: &[Account]) -> serde_json::Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(
            &mut buffer, PrettyFormatter::with_indent(Self::INDENT));
        accounts.serialize(&mut serializer)?;
        return Ok(buffer);
    }
}

impl AccountStore for JsonStore {
    /// A missing or blank file holds no accounts.
    fn load(&self) -> Result<Vec<Account>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no accounts file at {}, it will be created on first save", self.path.display());
                return Ok(Vec::new());
            },
            Err(source) => return Err(BackendError::Read { path: self.path.clone(), source }),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let accounts: Vec<Account> = serde_json::from_str(&content)
            .map_err(|source| BackendError::Parse { path: self.path.clone(), source })?;
        debug!("loaded {} accounts from {}", accounts.len(), self.path.display());
        return Ok(accounts);
    }

    fn save(&self, accounts: &[Account]) -> Result<()> {
        let write_error = |source: io::Error| BackendError::Write { path: self.path.clone(), source };

        let buffer = Self::to_pretty_json(accounts).map_err(|err| write_error(err.into()))?;
        fs::write(&self.path, buffer).map_err(write_error)?;
        debug!("saved {} accounts to {}", accounts.len(), self.path.display());
        return Ok(());
    }
}


#[cfg(test)]
mod tests {
    use crate::backend::{AccountStore, BackendError, JsonStore};
    use crate::core::{Account, Pin};

    use rstest::{fixture, rstest};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[fixture]
    fn accounts() -> Vec<Account> {
        vec![
            Account {
                name: "Bilbo".to_owned(),
                age: 111,
                email: "bilbo@shire.me".to_owned(),
                pin: Pin::new("0111").unwrap(),
                accountno: "a1B2c3#".parse().unwrap(),
                balance: 500,
            },
            Account {
                name: "Frodo".to_owned(),
                age: 33,
                email: "frodo@shire.me".to_owned(),
                pin: Pin::new("3333").unwrap(),
                accountno: "9x8Y7z!".parse().unwrap(),
                balance: 0,
            },
        ]
    }

    #[fixture]
    fn accounts_json() -> serde_json::Value {
        json!([
            {
                "name": "Bilbo",
                "age": 111,
                "email": "bilbo@shire.me",
                "pin": "0111",
                "accountno": "a1B2c3#",
                "balance": 500
            },
            {
                "name": "Frodo",
                "age": 33,
                "email": "frodo@shire.me",
                "pin": "3333",
                "accountno": "9x8Y7z!",
                "balance": 0
            }
        ])
    }

    #[fixture]
    fn workspace() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    #[rstest]
    fn accounts_serialize(accounts: Vec<Account>, accounts_json: serde_json::Value) {
        let value = serde_json::to_value(&accounts).unwrap();
        assert_eq!(value, accounts_json);
    }

    #[rstest]
    fn accounts_deserialize(accounts: Vec<Account>, accounts_json: serde_json::Value) {
        let parsed = serde_json::from_value::<Vec<Account>>(accounts_json).unwrap();
        assert_eq!(parsed, accounts);
    }

    #[rstest]
    fn saved_file_keeps_field_order(workspace: TempDir, accounts: Vec<Account>) {
        let store = JsonStore::new(workspace.path().join("data.json"));
        store.save(&accounts[..1]).unwrap();

        let written = fs::read_to_string(store.path()).unwrap();
        let expected = "[\n    {\n        \"name\": \"Bilbo\",\n        \"age\": 111,\n        \
            \"email\": \"bilbo@shire.me\",\n        \"pin\": \"0111\",\n        \
            \"accountno\": \"a1B2c3#\",\n        \"balance\": 500\n    }\n]";
        assert_eq!(written, expected);
    }

    #[rstest]
    fn save_then_load(workspace: TempDir, accounts: Vec<Account>) {
        let store = JsonStore::new(workspace.path().join("data.json"));
        store.save(&accounts).unwrap();
        assert_eq!(store.load().unwrap(), accounts);

        store.save(&[]).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("  \n\t"))]
    fn absent_or_blank_is_empty(workspace: TempDir, #[case] content: Option<&str>) {
        let store = JsonStore::new(workspace.path().join("data.json"));
        if let Some(content) = content {
            fs::write(store.path(), content).unwrap();
        }
        assert!(store.load().unwrap().is_empty());
    }

    #[rstest]
    #[case("not json")]
    #[case("{\"name\": \"Bilbo\"}")]
    #[case("[{\"name\": \"Bilbo\", \"age\": 111}]")]
    #[case("[{\"name\": \"B\", \"age\": 1, \"email\": \"e\", \"pin\": \"12\", \"accountno\": \"x\", \"balance\": 0}]")]
    #[case("[{\"name\": \"B\", \"age\": 1, \"email\": \"e\", \"pin\": \"1234\", \"accountno\": \"x\", \"balance\": -3}]")]
    fn malformed_content(workspace: TempDir, #[case] content: &str) {
        let store = JsonStore::new(workspace.path().join("data.json"));
        fs::write(store.path(), content).unwrap();
        assert!(matches!(store.load(), Err(BackendError::Parse { .. })));
    }

    #[rstest]
    fn legacy_integer_pin(workspace: TempDir) {
        let store = JsonStore::new(workspace.path().join("data.json"));
        fs::write(store.path(), json!([{
            "name": "Sam",
            "age": 38,
            "email": "sam@shire.me",
            "pin": 1234,
            "accountno": "q1w2e3%",
            "balance": 20
        }]).to_string()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded[0].pin.as_str(), "1234");
        assert!(loaded[0].matches("q1w2e3%", "1234"));
    }

    #[rstest]
    fn write_into_missing_directory(workspace: TempDir, accounts: Vec<Account>) {
        let store = JsonStore::new(workspace.path().join("missing").join("data.json"));
        assert!(matches!(store.save(&accounts), Err(BackendError::Write { .. })));
    }
}
