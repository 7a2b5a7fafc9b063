use poetry_image_build::ci_jobs;

use super::Project;

pub fn ci() -> anyhow::Result<()> {
    let project = Project::load()?;
    let versions = project.load_versions()?;

    println!("{}", serde_json::to_string(&ci_jobs(&versions))?);
    Ok(())
}
