use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::{
    auth::{decode_secret_key, generate_secret_key, AuthConfig, AuthManager},
    config::Config,
};
use homebook_core::{
    configuration::{ConfigurationService, ConfigurationServiceTrait},
    instance::{
        default_migrators, FileInstanceStore, InstanceStore, MigrationContext, MigratorRegistry,
        SchemaMigrator, SetupService, SetupServiceTrait, UpdateService, UpdateServiceTrait,
    },
    preferences::{UserPreferenceService, UserPreferenceServiceTrait},
    recipes::{RecipeService, RecipeServiceTrait},
    saving_goals::{SavingGoalService, SavingGoalServiceTrait},
    search::{
        RecipeSearchProvider, SavingGoalSearchProvider, SearchProvider, SearchService,
        SearchServiceTrait,
    },
    users::{UserService, UserServiceTrait},
};
use homebook_storage_sqlite::{
    configurations::ConfigurationRepository,
    db::{self, write_actor},
    preferences::UserPreferenceRepository,
    recipes::RecipeRepository,
    saving_goals::SavingGoalRepository,
    users::UserRepository,
    SqliteSchemaMigrator,
};
use semver::Version;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub app_version: Version,
    pub user_service: Arc<dyn UserServiceTrait>,
    pub configuration_service: Arc<dyn ConfigurationServiceTrait>,
    pub preference_service: Arc<dyn UserPreferenceServiceTrait>,
    pub saving_goal_service: Arc<dyn SavingGoalServiceTrait>,
    pub recipe_service: Arc<dyn RecipeServiceTrait>,
    pub search_service: Arc<dyn SearchServiceTrait>,
    pub setup_service: Arc<dyn SetupServiceTrait>,
    pub update_service: Arc<dyn UpdateServiceTrait>,
    pub auth: Arc<AuthManager>,
    ready: AtomicBool,
}

impl AppState {
    /// True once the instance is set up and its data matches the running
    /// version. Re-read from the instance markers until that happens.
    pub fn instance_ready(&self) -> homebook_core::Result<bool> {
        if self.ready.load(Ordering::Acquire) {
            return Ok(true);
        }
        let ready = self.setup_service.get_state()?.ready;
        if ready {
            tracing::info!("Instance is ready, serving all endpoints");
            self.ready.store(true, Ordering::Release);
        }
        Ok(ready)
    }
}

pub fn app_version() -> Version {
    Version::parse(env!("CARGO_PKG_VERSION")).unwrap_or_else(|_| Version::new(0, 0, 0))
}

pub fn init_tracing() {
    let log_format = std::env::var("HB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let app_version = app_version();

    let instance_store: Arc<dyn InstanceStore> =
        Arc::new(FileInstanceStore::new(&config.data_dir)?);
    tracing::info!("Instance data directory: {}", config.data_dir.display());

    db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);
    let pool = db::create_pool(&config.db_path)?;
    let writer = write_actor::spawn_writer((*pool).clone());
    // Migrations run as part of setup and update, never implicitly at startup.
    let schema_migrator: Arc<dyn SchemaMigrator> =
        Arc::new(SqliteSchemaMigrator::new(pool.clone()));

    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let user_service: Arc<dyn UserServiceTrait> = Arc::new(UserService::new(user_repository));

    let configuration_repository =
        Arc::new(ConfigurationRepository::new(pool.clone(), writer.clone()));
    let configuration_service: Arc<dyn ConfigurationServiceTrait> =
        Arc::new(ConfigurationService::new(configuration_repository));

    let preference_repository =
        Arc::new(UserPreferenceRepository::new(pool.clone(), writer.clone()));
    let preference_service: Arc<dyn UserPreferenceServiceTrait> =
        Arc::new(UserPreferenceService::new(preference_repository));

    let saving_goal_repository = Arc::new(SavingGoalRepository::new(pool.clone(), writer.clone()));
    let saving_goal_service: Arc<dyn SavingGoalServiceTrait> =
        Arc::new(SavingGoalService::new(saving_goal_repository));

    let recipe_repository = Arc::new(RecipeRepository::new(pool.clone(), writer.clone()));
    let recipe_service: Arc<dyn RecipeServiceTrait> =
        Arc::new(RecipeService::new(recipe_repository));

    let search_providers: Vec<Arc<dyn SearchProvider>> = vec![
        Arc::new(SavingGoalSearchProvider::new(saving_goal_service.clone())),
        Arc::new(RecipeSearchProvider::new(recipe_service.clone())),
    ];
    let search_service: Arc<dyn SearchServiceTrait> =
        Arc::new(SearchService::new(search_providers));

    let setup_service: Arc<dyn SetupServiceTrait> = Arc::new(SetupService::new(
        instance_store.clone(),
        schema_migrator.clone(),
        configuration_service.clone(),
        user_service.clone(),
        app_version.clone(),
        config.setup.clone(),
    ));
    let update_service: Arc<dyn UpdateServiceTrait> = Arc::new(UpdateService::new(
        instance_store,
        schema_migrator,
        MigratorRegistry::new(default_migrators())?,
        MigrationContext {
            configuration: configuration_service.clone(),
        },
        app_version.clone(),
    ));

    let jwt_secret = match config.secret_key.as_deref() {
        Some(raw) => decode_secret_key(raw)?,
        None => {
            tracing::warn!("HB_SECRET_KEY is not set; tokens will not survive a restart");
            generate_secret_key()
        }
    };
    let auth = Arc::new(AuthManager::new(&AuthConfig {
        jwt_secret,
        access_token_ttl: config.token_ttl,
    }));

    let instance = setup_service.get_state()?;
    tracing::info!(
        "HomeBook {} starting (setup: {:?}, instance version: {})",
        app_version,
        instance.setup_availability,
        instance.instance_version.as_deref().unwrap_or("none")
    );

    Ok(Arc::new(AppState {
        app_version,
        user_service,
        configuration_service,
        preference_service,
        saving_goal_service,
        recipe_service,
        search_service,
        setup_service,
        update_service,
        auth,
        ready: AtomicBool::new(instance.ready),
    }))
}
