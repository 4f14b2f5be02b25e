use crate::api::HttpDirectoryClient;
use crate::cli::output::OutputMode;
use crate::config::Config;
use crate::error::Result;
use crate::render::RenderOptions;
use crate::search::SearchSettings;
use crate::session::SessionStore;

pub struct AppContext {
    pub config: Config,
    pub session: SessionStore,
    pub robot_mode: bool,
    pub verbosity: u8,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())?;
        let session = SessionStore::from_config(&config.session)?;

        Ok(Self {
            config,
            session,
            robot_mode: cli.robot,
            verbosity: cli.verbose,
        })
    }

    #[must_use]
    pub const fn output_mode(&self) -> OutputMode {
        if self.robot_mode {
            OutputMode::Robot
        } else {
            OutputMode::Human
        }
    }

    pub fn api_client(&self) -> Result<HttpDirectoryClient> {
        HttpDirectoryClient::from_config(&self.config.api)
    }

    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::from(&self.config.render)
    }

    /// Viewer id to hide from results, unless disabled by config or flag.
    pub fn exclude_id(&self, include_self: bool) -> Result<Option<String>> {
        if include_self || !self.config.search.exclude_self {
            return Ok(None);
        }
        Ok(self
            .session
            .logged_in_user_id()?
            .filter(|id| !id.trim().is_empty()))
    }

    pub fn search_settings(&self, include_self: bool) -> Result<SearchSettings> {
        Ok(SearchSettings {
            debounce: self.config.search.debounce(),
            exclude_id: self.exclude_id(include_self)?,
            years: self.config.facets.years.clone(),
            render: self.render_options(),
        })
    }
}
