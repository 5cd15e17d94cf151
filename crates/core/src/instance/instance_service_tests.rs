use crate::configuration::{
    ConfigurationEntry, ConfigurationRepositoryTrait, ConfigurationService,
    ConfigurationServiceTrait,
};
use crate::constants::{CONFIG_DEFAULT_LOCALE, CONFIG_INSTANCE_CREATED_AT};
use crate::errors::{DatabaseError, Error, Result};
use crate::instance::{
    default_migrators, FileInstanceStore, InstanceStore, MigrationContext, MigratorRegistry,
    SchemaMigrator, SetupAvailability, SetupPreConfiguration, SetupRequest, SetupService,
    SetupServiceTrait, UpdateAvailability, UpdateMigrator, UpdateOutcome, UpdateService,
    UpdateServiceTrait,
};
use crate::users::{NewUserRecord, User, UserRepositoryTrait, UserService, UserServiceTrait};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use semver::Version;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};

// --- Mocks ---

#[derive(Default)]
struct InMemoryConfiguration {
    values: Mutex<BTreeMap<String, String>>,
}

#[async_trait]
impl ConfigurationRepositoryTrait for InMemoryConfiguration {
    fn get_all(&self) -> Result<Vec<ConfigurationEntry>> {
        Ok(self
            .values
            .lock()
            .unwrap()
            .iter()
            .map(|(key, value)| ConfigurationEntry {
                key: key.clone(),
                value: value.clone(),
            })
            .collect())
    }

    fn get_value(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

impl InMemoryUsers {
    fn update<F: FnOnce(&mut User)>(&self, user_id: &str, f: F) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| Error::Database(DatabaseError::NotFound(user_id.to_string())))?;
        f(user);
        Ok(user.clone())
    }
}

#[async_trait]
impl UserRepositoryTrait for InMemoryUsers {
    fn list(&self) -> Result<Vec<User>> {
        Ok(self.users.lock().unwrap().clone())
    }

    fn get_by_id(&self, user_id: &str) -> Result<User> {
        self.update(user_id, |_| {})
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    fn count(&self) -> Result<i64> {
        Ok(self.users.lock().unwrap().len() as i64)
    }

    async fn create(&self, record: NewUserRecord) -> Result<User> {
        let user = User {
            id: record.id,
            username: record.username,
            password_hash: record.password_hash,
            password_hash_type: record.password_hash_type,
            is_admin: record.is_admin,
            disabled: None,
            created_at: record.created_at,
        };
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn update_password(&self, user_id: &str, hash: String, hash_type: String) -> Result<User> {
        self.update(user_id, |u| {
            u.password_hash = hash;
            u.password_hash_type = hash_type;
        })
    }

    async fn update_username(&self, user_id: &str, username: String) -> Result<User> {
        self.update(user_id, |u| u.username = username)
    }

    async fn set_admin(&self, user_id: &str, is_admin: bool) -> Result<User> {
        self.update(user_id, |u| u.is_admin = is_admin)
    }

    async fn set_disabled(&self, user_id: &str, disabled: Option<NaiveDateTime>) -> Result<User> {
        self.update(user_id, |u| u.disabled = disabled)
    }

    async fn delete(&self, user_id: &str) -> Result<usize> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != user_id);
        Ok(before - users.len())
    }
}

#[derive(Default)]
struct CountingSchemaMigrator {
    runs: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl SchemaMigrator for CountingSchemaMigrator {
    async fn migrate(&self) -> Result<usize> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Database(DatabaseError::MigrationFailed(
                "disk full".to_string(),
            )));
        }
        Ok(3)
    }
}

struct RecordingMigrator {
    version: Version,
    log: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

#[async_trait]
impl UpdateMigrator for RecordingMigrator {
    fn version(&self) -> Version {
        self.version.clone()
    }

    fn description(&self) -> &'static str {
        "records its execution"
    }

    async fn execute(&self, _ctx: &MigrationContext) -> Result<()> {
        if self.fail {
            return Err(Error::Unexpected("boom".to_string()));
        }
        self.log.lock().unwrap().push(self.version.to_string());
        Ok(())
    }
}

// --- Harness ---

struct Harness {
    _dir: TempDir,
    store: Arc<FileInstanceStore>,
    schema: Arc<CountingSchemaMigrator>,
    configuration: Arc<dyn ConfigurationServiceTrait>,
    users: Arc<dyn UserServiceTrait>,
}

fn app_version() -> Version {
    Version::new(1, 2, 0)
}

fn harness_with(schema: CountingSchemaMigrator) -> Harness {
    let dir = tempdir().unwrap();
    let store = Arc::new(FileInstanceStore::new(dir.path()).unwrap());
    Harness {
        _dir: dir,
        store,
        schema: Arc::new(schema),
        configuration: Arc::new(ConfigurationService::new(Arc::new(
            InMemoryConfiguration::default(),
        ))),
        users: Arc::new(UserService::new(Arc::new(InMemoryUsers::default()))),
    }
}

fn harness() -> Harness {
    harness_with(CountingSchemaMigrator::default())
}

impl Harness {
    fn setup_service(&self, pre: SetupPreConfiguration) -> SetupService {
        SetupService::new(
            self.store.clone(),
            self.schema.clone(),
            self.configuration.clone(),
            self.users.clone(),
            app_version(),
            pre,
        )
    }

    fn update_service(&self, migrators: Vec<Arc<dyn UpdateMigrator>>) -> UpdateService {
        UpdateService::new(
            self.store.clone(),
            self.schema.clone(),
            MigratorRegistry::new(migrators).unwrap(),
            MigrationContext {
                configuration: self.configuration.clone(),
            },
            app_version(),
        )
    }

    fn provision(&self, version: &str) {
        self.store.write_setup_marker().unwrap();
        self.store.write_homebook_marker().unwrap();
        self.store
            .write_version(&Version::parse(version).unwrap())
            .unwrap();
    }
}

fn full_request() -> SetupRequest {
    SetupRequest {
        instance_name: Some("Family".to_string()),
        admin_username: Some("admin".to_string()),
        admin_password: Some("supersecret".to_string()),
        default_locale: Some("de-DE".to_string()),
        licenses_accepted: Some(true),
    }
}

fn recording(version: &str, log: &Arc<Mutex<Vec<String>>>) -> Arc<dyn UpdateMigrator> {
    Arc::new(RecordingMigrator {
        version: Version::parse(version).unwrap(),
        log: log.clone(),
        fail: false,
    })
}

// --- Setup ---

#[tokio::test]
async fn test_setup_provisions_fresh_instance() {
    let h = harness();
    let service = h.setup_service(SetupPreConfiguration::default());
    assert_eq!(service.get_availability().unwrap(), SetupAvailability::Available);

    let result = service.start_setup(full_request()).await.unwrap();
    assert_eq!(result.instance_name, "Family");
    assert_eq!(result.default_locale, "de-DE");
    assert!(result.admin.is_admin);
    assert_eq!(result.version, "1.2.0");

    assert_eq!(h.schema.runs.load(Ordering::SeqCst), 1);
    assert!(h.store.has_setup_marker().unwrap());
    assert!(h.store.has_homebook_marker().unwrap());
    assert_eq!(h.store.read_version().unwrap(), Some(app_version()));
    assert!(h
        .configuration
        .get_value(CONFIG_INSTANCE_CREATED_AT)
        .unwrap()
        .is_some());
    assert!(h.users.authenticate("admin", "supersecret").await.is_ok());

    assert_eq!(
        service.get_availability().unwrap(),
        SetupAvailability::AlreadyConfigured
    );
    assert!(service.get_state().unwrap().ready);
    assert!(matches!(
        service.start_setup(full_request()).await,
        Err(Error::Conflict(_))
    ));
}

#[tokio::test]
async fn test_setup_merges_pre_configuration() {
    let h = harness();
    let service = h.setup_service(SetupPreConfiguration {
        instance_name: Some("From env".to_string()),
        admin_username: Some("root-admin".to_string()),
        admin_password: Some("env-password".to_string()),
        default_locale: None,
        licenses_accepted: Some(true),
    });

    let info = service.get_pre_configuration();
    assert!(info.has_admin_password);
    assert_eq!(info.admin_username.as_deref(), Some("root-admin"));

    let result = service
        .start_setup(SetupRequest {
            instance_name: Some("From request".to_string()),
            ..SetupRequest::default()
        })
        .await
        .unwrap();
    assert_eq!(result.instance_name, "From request");
    assert_eq!(result.default_locale, "en-US");
    assert_eq!(result.admin.username, "root-admin");
}

#[tokio::test]
async fn test_setup_validation_and_licenses() {
    let h = harness();
    let service = h.setup_service(SetupPreConfiguration::default());

    let missing_user = SetupRequest {
        admin_username: None,
        ..full_request()
    };
    assert!(matches!(
        service.start_setup(missing_user).await,
        Err(Error::Validation(_))
    ));

    let bad_locale = SetupRequest {
        default_locale: Some("xx-XX".to_string()),
        ..full_request()
    };
    assert!(matches!(
        service.start_setup(bad_locale).await,
        Err(Error::Validation(_))
    ));

    let no_licenses = SetupRequest {
        licenses_accepted: Some(false),
        ..full_request()
    };
    assert!(matches!(
        service.start_setup(no_licenses).await,
        Err(Error::PreconditionFailed(_))
    ));

    assert!(!h.store.has_setup_marker().unwrap());
    assert_eq!(h.schema.runs.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failed_setup_removes_marker() {
    let h = harness_with(CountingSchemaMigrator {
        fail: true,
        ..CountingSchemaMigrator::default()
    });
    let service = h.setup_service(SetupPreConfiguration::default());

    let err = service.start_setup(full_request()).await.unwrap_err();
    assert!(matches!(err, Error::Instance(_)));
    assert!(!h.store.has_setup_marker().unwrap());
    assert!(!h.store.has_homebook_marker().unwrap());
    assert_eq!(service.get_availability().unwrap(), SetupAvailability::Available);
}

#[tokio::test]
async fn test_interrupted_setup_is_a_conflict() {
    let h = harness();
    h.store.write_setup_marker().unwrap();
    let service = h.setup_service(SetupPreConfiguration::default());
    assert_eq!(service.get_availability().unwrap(), SetupAvailability::Conflict);
    assert!(matches!(
        service.start_setup(full_request()).await,
        Err(Error::Conflict(_))
    ));
}

#[tokio::test]
async fn test_setup_reports_update_required_and_newer_instance() {
    let h = harness();
    let service = h.setup_service(SetupPreConfiguration::default());

    h.provision("1.0.0");
    assert_eq!(
        service.get_availability().unwrap(),
        SetupAvailability::UpdateRequired
    );

    h.store.write_version(&Version::new(2, 0, 0)).unwrap();
    assert_eq!(service.get_availability().unwrap(), SetupAvailability::Conflict);
}

// --- Update ---

#[tokio::test]
async fn test_update_requires_installation() {
    let h = harness();
    let service = h.update_service(default_migrators());
    assert_eq!(
        service.get_availability().unwrap(),
        UpdateAvailability::NotInstalled
    );
    assert!(matches!(
        service.start_update().await,
        Err(Error::PreconditionFailed(_))
    ));
}

#[tokio::test]
async fn test_update_runs_pending_migrators_in_order() {
    let h = harness();
    h.provision("1.0.0");
    let log = Arc::new(Mutex::new(Vec::new()));
    let service = h.update_service(vec![
        recording("1.2.0", &log),
        recording("0.9.0", &log),
        recording("1.3.0", &log),
        recording("1.1.0", &log),
        recording("1.0.0", &log),
    ]);

    let outcome = service.start_update().await.unwrap();
    assert_eq!(
        outcome,
        UpdateOutcome::Updated {
            from: "1.0.0".to_string(),
            to: "1.2.0".to_string(),
            applied_migrators: vec!["1.1.0".to_string(), "1.2.0".to_string()],
        }
    );
    assert_eq!(*log.lock().unwrap(), vec!["1.1.0", "1.2.0"]);
    assert_eq!(h.store.read_version().unwrap(), Some(app_version()));
    assert_eq!(h.schema.runs.load(Ordering::SeqCst), 1);

    assert_eq!(service.start_update().await.unwrap(), UpdateOutcome::UpToDate);
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_shipped_migrators_seed_configuration() {
    let h = harness();
    h.provision("1.0.0");
    let service = h.update_service(default_migrators());

    service.start_update().await.unwrap();
    assert_eq!(
        h.configuration.get_value(CONFIG_DEFAULT_LOCALE).unwrap(),
        Some("en-US".to_string())
    );
    assert!(h
        .configuration
        .get_value(CONFIG_INSTANCE_CREATED_AT)
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_failing_migrator_leaves_version_untouched() {
    let h = harness();
    h.provision("1.0.0");
    let log = Arc::new(Mutex::new(Vec::new()));
    let service = h.update_service(vec![
        recording("1.1.0", &log),
        Arc::new(RecordingMigrator {
            version: Version::new(1, 2, 0),
            log: log.clone(),
            fail: true,
        }),
    ]);

    let err = service.start_update().await.unwrap_err();
    assert!(matches!(err, Error::Instance(_)));
    assert_eq!(
        h.store.read_version().unwrap(),
        Some(Version::new(1, 0, 0))
    );
    assert_eq!(*log.lock().unwrap(), vec!["1.1.0"]);
}

#[tokio::test]
async fn test_downgrade_is_a_conflict() {
    let h = harness();
    h.provision("1.5.0");
    let service = h.update_service(default_migrators());
    assert!(matches!(
        service.get_availability().unwrap(),
        UpdateAvailability::Downgrade { .. }
    ));
    assert!(matches!(service.start_update().await, Err(Error::Conflict(_))));
}
