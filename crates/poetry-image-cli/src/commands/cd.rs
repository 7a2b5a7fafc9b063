use poetry_image_build::cd_jobs;
use poetry_image_core::NewVersions;

use super::Project;

pub fn cd() -> anyhow::Result<()> {
    let project = Project::load()?;
    let versions = project.load_versions()?;

    let handoff_path = project.config.paths.new_versions_file(&project.root);
    let changed = NewVersions::load(&handoff_path)?;
    if changed.is_some() {
        tracing::info!(path = %handoff_path.display(), "limiting CD matrix to updated versions");
    }

    let jobs = cd_jobs(&versions, &project.config.project.image, changed.as_ref())?;
    println!("{}", serde_json::to_string(&jobs)?);
    Ok(())
}
