use std::path::PathBuf;

use crate::infra::sqlite::queries::{delete_setting, load_setting, upsert_setting};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::repo::{RepoError, SettingsRepository};

pub struct SqliteSettingsRepo {
    pub db_path: PathBuf,
}

impl SqliteSettingsRepo {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }
}

impl SettingsRepository for SqliteSettingsRepo {
    fn init(&self) -> Result<(), RepoError> {
        init_db(&self.db_path).map_err(|err| RepoError::Message(format!("{err:#}")))
    }

    fn load_setting(&self, key: &str) -> Result<Option<String>, RepoError> {
        load_setting(&self.db_path, key).map_err(|err| RepoError::Message(format!("{err:#}")))
    }

    fn store_setting(&self, key: &str, value: &str) -> Result<(), RepoError> {
        upsert_setting(&self.db_path, key, value)
            .map_err(|err| RepoError::Message(format!("{err:#}")))
    }

    fn remove_setting(&self, key: &str) -> Result<(), RepoError> {
        delete_setting(&self.db_path, key).map_err(|err| RepoError::Message(format!("{err:#}")))
    }
}
