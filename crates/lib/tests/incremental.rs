//! End-to-end checks of the engine over the real filesystem actions.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, SystemTime};

use bild_lib::action::{Actions, PackageSpec, SystemActions};
use bild_lib::execute::{BuildContext, ExecuteError};
use bild_lib::manifest::JarManifest;
use tempfile::TempDir;

/// Defines `bundle`, which zips `src` into `dist/bundle.jar` unless it is current.
fn bundle_context(root: &Path, packaged: Rc<Cell<usize>>) -> BuildContext {
  let actions: Rc<dyn Actions> = Rc::new(SystemActions::new(root.join("m2")).unwrap());
  let src = root.join("src");
  let jar = root.join("dist/bundle.jar");

  let mut ctx = BuildContext::new();
  let cleanup = Rc::clone(&actions);
  let dist = root.join("dist");
  ctx.define("clean", move |_| Ok(cleanup.remove_tree(&dist)?)).unwrap();
  ctx
    .define("bundle", move |ctx| {
      if !actions.stale(&[src.clone()], &jar) {
        return Ok(());
      }
      let manifest = JarManifest::new()
        .with("Created-By", "bild")
        .map_err(bild_lib::action::ActionError::from)?;
      actions.package(&PackageSpec {
        output: jar.clone(),
        source_dirs: vec![src.clone()],
        manifest: Some(manifest),
      })?;
      packaged.set(packaged.get() + 1);
      ctx.note(format!("Generated {}", jar.display()));
      Ok(())
    })
    .unwrap();
  ctx
}

fn project() -> TempDir {
  let temp = TempDir::new().unwrap();
  std::fs::create_dir_all(temp.path().join("src/org/example")).unwrap();
  let source = temp.path().join("src/org/example/A.java");
  std::fs::write(&source, "class A {}").unwrap();
  // Keep sources clearly older than anything packaged during the test.
  let past = SystemTime::now() - Duration::from_secs(3600);
  std::fs::File::options().write(true).open(&source).unwrap().set_modified(past).unwrap();
  temp
}

#[test]
fn second_invocation_skips_current_artifact() {
  let temp = project();
  let packaged = Rc::new(Cell::new(0));

  bundle_context(temp.path(), Rc::clone(&packaged)).run_root("bundle").unwrap();
  assert_eq!(packaged.get(), 1);
  assert!(temp.path().join("dist/bundle.jar").is_file());

  // A new context starts with nothing done; only the timestamps carry over.
  let mut ctx = bundle_context(temp.path(), Rc::clone(&packaged));
  ctx.run_root("bundle").unwrap();
  assert_eq!(packaged.get(), 1);
  assert_eq!(ctx.completed(), ["bundle"]);
}

#[test]
fn clean_forces_rebuild() {
  let temp = project();
  let packaged = Rc::new(Cell::new(0));

  bundle_context(temp.path(), Rc::clone(&packaged)).run_root("bundle").unwrap();
  bundle_context(temp.path(), Rc::clone(&packaged)).run_root("clean").unwrap();
  assert!(!temp.path().join("dist").exists());

  bundle_context(temp.path(), Rc::clone(&packaged)).run_root("bundle").unwrap();
  assert_eq!(packaged.get(), 2);
}

#[test]
fn packaged_jar_starts_with_manifest() {
  let temp = project();
  bundle_context(temp.path(), Rc::new(Cell::new(0)))
    .run_root("bundle")
    .unwrap();

  let file = std::fs::File::open(temp.path().join("dist/bundle.jar")).unwrap();
  let mut archive = zip::ZipArchive::new(file).unwrap();
  let names: Vec<PathBuf> = (0..archive.len())
    .map(|i| PathBuf::from(archive.by_index(i).unwrap().name()))
    .collect();

  assert_eq!(names[0], PathBuf::from("META-INF/"));
  assert_eq!(names[1], PathBuf::from("META-INF/MANIFEST.MF"));
  assert!(names.contains(&PathBuf::from("org/example/A.java")));
}

#[test]
fn missing_sources_fail_the_target() {
  let temp = TempDir::new().unwrap();
  let actions = Rc::new(SystemActions::new(temp.path().join("m2")).unwrap());
  let src = temp.path().join("src");
  let out = temp.path().join("out");

  let mut ctx = BuildContext::new();
  ctx
    .define("mksrc", move |_| Ok(actions.copy_tree(&src, &out)?))
    .unwrap();

  let err = ctx.run_root("mksrc").unwrap_err();
  assert!(matches!(err, ExecuteError::TargetFailed { ref target, .. } if target == "mksrc"));
}
