use crate::error::{VertagusError, Result};
use crate::git::TagRepository;
use git2::{
    Cred, CredentialType, Direction, PushOptions, RemoteCallbacks, Repository as Git2Repo, Signature,
};
use std::path::Path;
use tracing::{debug, info, warn};

const FALLBACK_USER_NAME: &str = "vertagus";
const FALLBACK_USER_EMAIL: &str = "vertagus@example.com";

/// Wrapper around git2::Repository with our trait interface
///
/// Tags are created annotated, with the tag name as message. When a remote
/// is configured, created and deleted tags are pushed to it and tag listings
/// come from the remote, so a clone without fetched tags still sees them.
pub struct Git2Repository {
    repo: Git2Repo,
    remote: Option<String>,
}

impl Git2Repository {
    /// Open or discover a git repository
    ///
    /// # Arguments
    /// * `path` - Path inside the working tree
    /// * `remote` - Remote to push tags to, or `None` to keep tags local
    pub fn open<P: AsRef<Path>>(path: P, remote: Option<&str>) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        info!("Opened git repository at {}", repo.path().display());

        Ok(Git2Repository {
            repo,
            remote: remote.map(str::to_string),
        })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo, remote: Option<&str>) -> Self {
        Git2Repository {
            repo,
            remote: remote.map(str::to_string),
        }
    }

    fn signature(&self) -> Result<Signature<'static>> {
        match self.repo.signature() {
            Ok(signature) => Ok(signature.to_owned()),
            Err(_) => Ok(Signature::now(FALLBACK_USER_NAME, FALLBACK_USER_EMAIL)?),
        }
    }

    fn push(&self, refspec: &str) -> Result<()> {
        let Some(remote_name) = self.remote.as_deref() else {
            return Ok(());
        };
        let mut remote = self
            .repo
            .find_remote(remote_name)
            .map_err(|e| VertagusError::remote(format!("Cannot find remote: {}", e)))?;

        let mut options = PushOptions::new();
        options.remote_callbacks(remote_callbacks());

        remote
            .push(&[refspec], Some(&mut options))
            .map_err(|e| VertagusError::remote(format!("Push of '{}' failed: {}", refspec, e)))?;

        Ok(())
    }

    fn local_tag_names(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;
        Ok(tags.iter().flatten().map(str::to_string).collect())
    }

    /// Tag names advertised by `remote_name`, like `git ls-remote --tags`.
    fn remote_tag_names(&self, remote_name: &str) -> Result<Vec<String>> {
        let mut remote = self.repo.find_remote(remote_name)?;
        let connection = remote
            .connect_auth(Direction::Fetch, Some(remote_callbacks()), None)
            .map_err(|e| {
                VertagusError::remote(format!("Cannot connect to remote '{}': {}", remote_name, e))
            })?;

        let names = connection
            .list()?
            .iter()
            .filter_map(|head| head.name().strip_prefix("refs/tags/"))
            .filter(|name| !name.ends_with("^{}"))
            .map(str::to_string)
            .collect();
        Ok(names)
    }
}

/// Credentials callback trying SSH keys from ~/.ssh, the SSH agent, then defaults.
fn remote_callbacks() -> RemoteCallbacks<'static> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");
        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        Cred::default()
    });
    callbacks
}

impl TagRepository for Git2Repository {
    fn create_tag(&self, name: &str, reference: Option<&str>) -> Result<()> {
        let target = self
            .repo
            .revparse_single(reference.unwrap_or("HEAD"))
            .and_then(|object| object.peel_to_commit())
            .map_err(|e| VertagusError::tag(format!("Cannot resolve reference: {}", e)))?;

        info!("Creating tag {} at commit {}", name, target.id());
        let signature = self.signature()?;
        self.repo
            .tag(name, target.as_object(), &signature, name, false)
            .map_err(|e| VertagusError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        if let Err(e) = self.push(&format!("refs/tags/{}:refs/tags/{}", name, name)) {
            warn!("Removing local tag {} after failed push", name);
            if let Err(rollback) = self.repo.tag_delete(name) {
                return Err(VertagusError::tag(format!(
                    "Tag '{}' was created locally but not pushed ({}), and removing it failed: {}",
                    name, e, rollback
                )));
            }
            return Err(e);
        }
        Ok(())
    }

    /// Delete the tag locally and on the remote.
    ///
    /// With a remote configured the two deletes are independent: a missing
    /// local tag is logged and the remote tag is still removed.
    fn delete_tag(&self, name: &str) -> Result<()> {
        let local = self
            .repo
            .tag_delete(name)
            .map_err(|e| VertagusError::tag(format!("Cannot delete tag '{}': {}", name, e)));
        if self.remote.is_none() {
            return local;
        }

        if let Err(e) = &local {
            warn!("Error encountered while deleting local tag {}: {}", name, e);
        }
        self.push(&format!(":refs/tags/{}", name))
    }

    fn list_tags(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        let mut names = match self.remote.as_deref() {
            Some(remote_name) if self.repo.find_remote(remote_name).is_ok() => {
                self.remote_tag_names(remote_name)?
            }
            Some(remote_name) => {
                debug!("Remote {} is not configured, listing local tags", remote_name);
                self.local_tag_names()?
            }
            None => self.local_tag_names()?,
        };

        if let Some(prefix) = prefix {
            names.retain(|name| name.starts_with(prefix));
        }
        names.sort();
        names.dedup();
        Ok(names)
    }
}

// SAFETY: Git2Repository wraps git2::Repository which is Send; every trait
// method takes &self and libgit2 is built thread-safe.
unsafe impl Sync for Git2Repository {}
