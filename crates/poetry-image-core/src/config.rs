use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name of the optional project configuration file.
pub const CONFIG_FILE: &str = "poetry-image.toml";

/// poetry-image.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Docker Hub repository the image is published to
    #[serde(default = "default_image")]
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Pinned version tables, relative to the project root
    #[serde(default = "default_versions_file")]
    pub versions_file: PathBuf,
    /// Directory holding `Dockerfile-{variant}.template` files
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
    /// Versions changed by the last update, read by the CD job generator
    #[serde(default = "default_new_versions_file")]
    pub new_versions_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// `user.name` configured before committing updates
    #[serde(default = "default_git_user_name")]
    pub user_name: String,
    /// `user.email` configured before committing updates
    #[serde(default = "default_git_user_email")]
    pub user_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,
    /// GitHub `owner/repo` whose tags are Poetry releases
    #[serde(default = "default_poetry_repository")]
    pub poetry_repository: String,
    #[serde(default = "default_docker_auth_url")]
    pub docker_auth_url: String,
    #[serde(default = "default_docker_registry_url")]
    pub docker_registry_url: String,
    /// Registry repository whose tags are Python image releases
    #[serde(default = "default_python_repository")]
    pub python_repository: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            image: default_image(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            versions_file: default_versions_file(),
            templates_dir: default_templates_dir(),
            new_versions_file: default_new_versions_file(),
        }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            user_name: default_git_user_name(),
            user_email: default_git_user_email(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            github_api_url: default_github_api_url(),
            poetry_repository: default_poetry_repository(),
            docker_auth_url: default_docker_auth_url(),
            docker_registry_url: default_docker_registry_url(),
            python_repository: default_python_repository(),
        }
    }
}

impl ImageConfig {
    /// Load from poetry-image.toml at the given path, or return defaults if not found.
    pub fn load(project_dir: &Path) -> crate::Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE);
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            Ok(Self::default())
        }
    }
}

impl PathsConfig {
    pub fn versions_file(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.versions_file)
    }

    pub fn templates_dir(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.templates_dir)
    }

    pub fn new_versions_file(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.new_versions_file)
    }
}

fn default_image() -> String {
    "mateusoliveira43/poetry".to_owned()
}

fn default_versions_file() -> PathBuf {
    PathBuf::from("versions.toml")
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_new_versions_file() -> PathBuf {
    PathBuf::from(".github/new_versions.json")
}

fn default_git_user_name() -> String {
    "github-actions".to_owned()
}

fn default_git_user_email() -> String {
    "github-actions@github.com".to_owned()
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_owned()
}

fn default_poetry_repository() -> String {
    "python-poetry/poetry".to_owned()
}

fn default_docker_auth_url() -> String {
    "https://auth.docker.io".to_owned()
}

fn default_docker_registry_url() -> String {
    "https://index.docker.io".to_owned()
}

fn default_python_repository() -> String {
    "library/python".to_owned()
}
