mod list;
mod run;

pub use list::cmd_list;
pub use run::cmd_run;

use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use tracing::debug;

use bild_lib::action::SystemActions;
use bild_lib::config::RecipeConfig;
use bild_lib::execute::BuildContext;
use bild_lib::recipe::{Recipe, register};

/// A fresh build context with the recipe for `root` registered.
fn recipe_context(root: &Path, verbose: bool) -> Result<BuildContext> {
  let config = RecipeConfig::from_env(root);
  debug!(root = %root.display(), jar_cache = %config.jar_cache.display(), "loaded recipe configuration");
  let actions = SystemActions::new(config.maven_repo.clone()).context("Failed to initialise build actions")?;

  let mut ctx = BuildContext::new();
  ctx.set_verbose(verbose);
  register(&mut ctx, Rc::new(Recipe::new(config, Rc::new(actions)))).context("Failed to register targets")?;
  Ok(ctx)
}
