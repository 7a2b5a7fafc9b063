use std::process::ExitCode;

use colored::Colorize;
use poetry_image_core::{
    Diagnostic, NewVersions, Software, UpstreamConfig, apply_updates, reconcile,
};
use poetry_image_upstream::{DockerHubTags, GitClient, GitHubTags, TagSource};

use super::Project;
use super::dockerfiles::write_current;

pub struct UpdateOptions {
    pub software: Software,
    pub check: bool,
    pub github_token: Option<String>,
}

pub async fn update(options: UpdateOptions) -> anyhow::Result<ExitCode> {
    let UpdateOptions {
        software,
        check,
        github_token,
    } = options;

    let project = Project::load()?;
    let mut versions = project.load_versions()?;

    let tags = fetch_tags(&project.config.upstream, software, github_token).await?;

    let candidates = reconcile(&tags, versions.table(software));
    if candidates.is_empty() {
        println!("{}", format!("{software} versions are already updated.").green());
        return Ok(ExitCode::SUCCESS);
    }

    if check {
        let location = project.versions_path().display().to_string();
        for diagnostic in Diagnostic::for_candidates(software, &candidates, &location) {
            eprintln!("{}", diagnostic.to_string().red());
        }
        return Ok(ExitCode::from(check_exit_code(candidates.len())));
    }

    println!("{software} updates are available");
    let added = apply_updates(versions.table_mut(software), &candidates);
    for version in &added {
        println!("    Adding {software} version {version}");
    }

    versions.save(&project.versions_path())?;
    NewVersions::for_software(software, added)
        .save(&project.config.paths.new_versions_file(&project.root))?;
    write_current(&project, &versions)?;

    let git = GitClient::new(&project.root);
    git.configure_identity(&project.config.git.user_name, &project.config.git.user_email)
        .await?;
    git.publish_update(software).await?;

    println!("{}", format!("{software} versions updated successfully").green());
    Ok(ExitCode::SUCCESS)
}

async fn fetch_tags(
    upstream: &UpstreamConfig,
    software: Software,
    github_token: Option<String>,
) -> anyhow::Result<Vec<String>> {
    match software {
        Software::Poetry => {
            let source = GitHubTags::new(&upstream.github_api_url, &upstream.poetry_repository)?
                .with_token(github_token);
            fetch_from(&source).await
        }
        Software::Python => {
            let source = DockerHubTags::new(
                &upstream.docker_auth_url,
                &upstream.docker_registry_url,
                &upstream.python_repository,
            )?;
            fetch_from(&source).await
        }
    }
}

async fn fetch_from<S: TagSource>(source: &S) -> anyhow::Result<Vec<String>> {
    let tags = source.fetch_tags().await?;
    tracing::info!(software = %source.software(), count = tags.len(), "fetched upstream tags");
    Ok(tags)
}

/// Check mode exits with the number of missing versions, saturating at 255.
fn check_exit_code(candidates: usize) -> u8 {
    match u8::try_from(candidates) {
        Ok(code) => code,
        Err(_) => u8::MAX,
    }
}
