//! The symtab build recipe.
//!
//! [`register`] defines the targets on a [`BuildContext`]. Each body is a free
//! function over a shared [`Recipe`]; all side effects go through the recipe's
//! [`Actions`].
//!
//! | target    | does                                                   |
//! |-----------|--------------------------------------------------------|
//! | `compile` | fetch the ANTLR jar, compile `src` into `out`          |
//! | `_mkjar`  | package `out` with an OSGi-ready manifest              |
//! | `mkjar`   | `clean`, then `_mkjar`                                 |
//! | `mksrc`   | bundle the sources jar                                 |
//! | `mkdoc`   | javadoc jar, skipped when already up to date           |
//! | `install` | publish to the local Maven repository and the lib dir  |
//! | `clean`   | remove `dist`, `out` and `doc`                         |
//! | `all`     | everything, then clean again                           |

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use tracing::{debug, info};

use crate::action::{ActionError, Actions, CompileConfig, CompileResult, DocSpec, PackageSpec, PublishSpec};
use crate::config::RecipeConfig;
use crate::execute::{BuildContext, ExecuteError};
use crate::manifest::JarManifest;

type Result<T> = std::result::Result<T, ExecuteError>;

/// Configuration and collaborators shared by every target body.
pub struct Recipe {
  config: RecipeConfig,
  actions: Rc<dyn Actions>,
  /// Result of the last `compile` run, consumed by `_mkjar` for `Export-Package`.
  compiled: RefCell<Option<CompileResult>>,
}

impl Recipe {
  pub fn new(config: RecipeConfig, actions: Rc<dyn Actions>) -> Self {
    Self {
      config,
      actions,
      compiled: RefCell::new(None),
    }
  }

  /// `path` relative to the project root, for progress messages.
  fn display(&self, path: &Path) -> String {
    path.strip_prefix(&self.config.root).unwrap_or(path).display().to_string()
  }
}

/// Define every recipe target on `ctx`.
pub fn register(ctx: &mut BuildContext, recipe: Rc<Recipe>) -> Result<()> {
  let targets: [(&str, &str, fn(&mut BuildContext, &Recipe) -> Result<()>); 8] = [
    ("compile", "Compile the Java sources against ANTLR 4.5", compile),
    ("_mkjar", "Package compiled classes into an OSGi-ready jar", mkjar_inner),
    ("mkjar", "Clean, then build the library jar", mkjar),
    ("mksrc", "Build the sources jar", mksrc),
    ("mkdoc", "Build the javadoc jar if it is out of date", mkdoc),
    ("install", "Install the jars into the local Maven repository", install),
    ("clean", "Remove all build output directories", clean),
    ("all", "Build and install everything, then clean", all),
  ];

  for (name, description, body) in targets {
    let recipe = Rc::clone(&recipe);
    ctx.define_with_description(name, description, move |ctx| body(ctx, &recipe))?;
  }

  debug!(count = ctx.targets().len(), "recipe registered");
  Ok(())
}

fn compile(_ctx: &mut BuildContext, r: &Recipe) -> Result<()> {
  let c = &r.config;
  let antlr = r.actions.fetch(&c.antlr_jar_url, &c.jar_cache)?;

  let result = r.actions.compile(&CompileConfig {
    source_roots: vec![c.src_dir.clone()],
    out_dir: c.out_dir.clone(),
    classpath: vec![c.out_dir.clone(), antlr],
    release: c.release.clone(),
    args: c.javac_args.clone(),
  })?;

  info!(classes = result.class_count, "compiled");
  *r.compiled.borrow_mut() = Some(result);
  Ok(())
}

fn mkjar_inner(ctx: &mut BuildContext, r: &Recipe) -> Result<()> {
  ctx.require("compile")?;

  let manifest = jar_manifest(r)?;
  let jar = r.actions.package(&PackageSpec {
    output: r.config.jar_path(),
    source_dirs: vec![r.config.out_dir.clone()],
    manifest: Some(manifest),
  })?;

  ctx.note(format!("Generated {}", r.display(&jar)));
  ctx.note(format!("Made jar OSGi-ready {}", r.display(&jar)));
  Ok(())
}

/// Implementation and bundle headers, plus the OSGi headers derived from the
/// compiled packages.
fn jar_manifest(r: &Recipe) -> Result<JarManifest> {
  let c = &r.config;
  let version = c.version();
  let jdk = r.actions.java_version()?;

  let mut manifest = JarManifest::new()
    .with("Implementation-Vendor", &c.vendor)
    .and_then(|m| m.with("Implementation-Vendor-Id", &c.vendor_id))
    .and_then(|m| m.with("Implementation-Title", &c.title))
    .and_then(|m| m.with("Implementation-Version", version))
    .and_then(|m| m.with("Built-By", &c.built_by))
    .and_then(|m| m.with("Build-Jdk", jdk))
    .and_then(|m| m.with("Created-By", &c.created_by))
    .and_then(|m| m.with("Bundle-Description", &c.title))
    .and_then(|m| m.with("Bundle-DocURL", &c.doc_url))
    .and_then(|m| m.with("Bundle-License", &c.license_url))
    .and_then(|m| m.with("Bundle-Name", &c.title))
    .and_then(|m| m.with("Bundle-SymbolicName", &c.symbolic_name))
    .and_then(|m| m.with("Bundle-Vendor", &c.vendor))
    .and_then(|m| m.with("Bundle-Version", version))
    .and_then(|m| m.with("Bundle-ManifestVersion", "2"))
    .map_err(ActionError::from)?;

  let packages = r
    .compiled
    .borrow()
    .as_ref()
    .map(|result| result.packages.iter().cloned().collect::<Vec<_>>())
    .unwrap_or_default();

  if !packages.is_empty() {
    let exports: Vec<String> = packages
      .iter()
      .map(|p| format!("{p};version=\"{version}\""))
      .collect();
    manifest
      .insert("Export-Package", exports.join(","))
      .map_err(ActionError::from)?;
  }

  Ok(manifest)
}

fn mkjar(ctx: &mut BuildContext, _r: &Recipe) -> Result<()> {
  ctx.require("clean")?;
  ctx.require("_mkjar")
}

fn mksrc(ctx: &mut BuildContext, r: &Recipe) -> Result<()> {
  let c = &r.config;
  let staging = c.sources_staging_dir();

  r.actions.copy_tree(&c.src_dir, &staging)?;
  r.actions.remove_named(&staging, ".DS_Store")?;

  let jar = r.actions.package(&PackageSpec {
    output: c.sources_jar_path(),
    source_dirs: vec![staging],
    manifest: None,
  })?;

  ctx.note(format!("Generated {}", r.display(&jar)));
  Ok(())
}

fn mkdoc(ctx: &mut BuildContext, r: &Recipe) -> Result<()> {
  let c = &r.config;
  let doc_jar = c.javadoc_jar_path();

  // Checked before requiring mksrc, so an up-to-date javadoc jar costs nothing.
  if !r.actions.stale(&[c.src_dir.clone(), c.sources_jar_path()], &doc_jar) {
    info!(artifact = %doc_jar.display(), "javadoc jar is up to date");
    return Ok(());
  }

  ctx.require("mksrc")?;

  let runtime_dir = &c.runtime_sources_dir;
  r.actions.make_dir(runtime_dir)?;
  let runtime_jar = r.actions.fetch(&c.runtime_sources_url, runtime_dir)?;
  r.actions.unpack(&runtime_jar, runtime_dir)?;

  let out_dir = c.javadoc_out_dir();
  r.actions.make_dir(&out_dir)?;
  r.actions.javadoc(&DocSpec {
    source_path: vec![c.src_dir.clone(), runtime_dir.clone()],
    out_dir: out_dir.clone(),
    packages: c.doc_packages.clone(),
    exclude: c.doc_exclude.clone(),
  })?;

  let jar = r.actions.package(&PackageSpec {
    output: doc_jar,
    source_dirs: vec![out_dir],
    manifest: None,
  })?;

  ctx.note(format!("Generated {}", r.display(&jar)));
  Ok(())
}

fn install(ctx: &mut BuildContext, r: &Recipe) -> Result<()> {
  ctx.require("mkjar")?;
  ctx.require("mksrc")?;
  ctx.require("mkdoc")?;

  let c = &r.config;
  let jar = c.jar_path();

  ctx.note(format!(
    "Maven installing {} and *-sources.jar, *-javadoc.jar",
    r.display(&jar)
  ));
  let published = r.actions.publish(&PublishSpec {
    binary: jar.clone(),
    sources: c.sources_jar_path(),
    javadoc: c.javadoc_jar_path(),
    coordinates: c.coordinates.clone(),
  })?;
  debug!(path = %published.repository_path.display(), "published");

  if c.lib_dir.is_dir() {
    let lib_jar = c
      .lib_dir
      .join(format!("{}-{}.jar", c.coordinates.artifact_id, c.version()));
    ctx.note(format!("Installing {}", lib_jar.display()));
    r.actions.copy_file(&jar, &lib_jar)?;
  }

  Ok(())
}

fn clean(_ctx: &mut BuildContext, r: &Recipe) -> Result<()> {
  remove_outputs(r)
}

fn all(ctx: &mut BuildContext, r: &Recipe) -> Result<()> {
  for name in ["mkjar", "mkdoc", "mksrc", "install"] {
    ctx.require(name)?;
  }
  // `clean` is already done at this point; remove the outputs directly.
  remove_outputs(r)
}

fn remove_outputs(r: &Recipe) -> Result<()> {
  for dir in r.config.output_dirs() {
    r.actions.remove_tree(dir)?;
  }
  Ok(())
}
