//! Centralized initialization for repository commands.
//!
//! Almost every kunj command needs the same three things: the repository it runs in,
//! the branch metadata store for that repository and the merged configuration.
//! [`CommandContext::init`] resolves them once, in that order, so a command fails with
//! `NotInGitRepo` before touching anything else.

use crate::core::{
    config::{ConfigLoader, KunjConfig},
    error::{KunjError, Result},
    git::GitRepo,
    metadata::MetadataStore,
    stash::StashReconciler,
};

pub struct CommandContext {
    pub repo: GitRepo,
    pub store: MetadataStore,
    pub loader: ConfigLoader,
    pub config: KunjConfig,
}

impl CommandContext {
    /// Context for the repository containing the current directory
    pub fn init() -> Result<Self> {
        let repo = GitRepo::open_current().map_err(|_| KunjError::NotInGitRepo)?;
        Ok(Self::for_repo(repo))
    }

    pub fn for_repo(repo: GitRepo) -> Self {
        let store = MetadataStore::for_repo(&repo);
        let loader = ConfigLoader::for_workdir(Some(repo.workdir()));
        let config = loader.load();
        log::debug!(
            "Initialized command context for {} (autoStash={}, personalWIPMode={})",
            repo.workdir().display(),
            config.preferences.auto_stash,
            config.preferences.personal_wip_mode
        );
        Self {
            repo,
            store,
            loader,
            config,
        }
    }

    pub fn reconciler(&self) -> StashReconciler<'_> {
        StashReconciler::new(&self.repo, &self.store)
    }

    pub fn current_branch(&self) -> Result<String> {
        self.repo.get_current_branch()
    }

    /// `branch`, or the current branch when none was given; the branch must exist locally
    pub fn resolve_branch(&self, branch: Option<&str>) -> Result<String> {
        match branch {
            Some(name) if self.repo.branch_exists(name) => Ok(name.to_string()),
            Some(name) => Err(KunjError::branch_not_found(name)),
            None => self.current_branch(),
        }
    }

    /// Whether auto-stash applies, given a `--no-stash` flag
    pub fn auto_stash(&self, no_stash: bool) -> bool {
        self.config.preferences.auto_stash && !no_stash
    }
}
