/* src/cli/core/src/build/config.rs */

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use anyhow::{Result, bail};

use crate::config::{BundleFormat, StudioConfig};

/// Frontend pass inputs, paths absolute.
#[derive(Debug, Clone)]
pub struct FrontendConfig {
  pub root: PathBuf,
  pub client_root: PathBuf,
  pub public_dir: PathBuf,
  pub aliases: BTreeMap<String, PathBuf>,
  pub plugins: Vec<String>,
  pub vite: Option<String>,
}

/// Backend pass inputs, paths absolute.
#[derive(Debug, Clone)]
pub struct BackendConfig {
  pub root: PathBuf,
  pub entry: PathBuf,
  pub outfile: PathBuf,
  pub manifest: PathBuf,
  pub format: BundleFormat,
  pub minify: bool,
  pub defines: BTreeMap<String, String>,
  pub esbuild: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BuildConfig {
  pub project_name: Option<String>,
  pub root: PathBuf,
  pub out_dir: PathBuf,
  pub frontend: FrontendConfig,
  pub backend: BackendConfig,
}

impl BuildConfig {
  pub fn from_studio_config(config: &StudioConfig, root: &Path) -> Result<Self> {
    let paths = &config.paths;

    // The cleaner deletes out_dir recursively, so it has to stay strictly inside the project.
    let out_rel = checked_relative("paths.out_dir", &paths.out_dir)?;
    let public_rel = checked_relative("paths.public_dir", &paths.public_dir)?;
    let bundle_rel = checked_relative("paths.server_bundle", &paths.server_bundle)?;
    if bundle_rel.starts_with(&public_rel) || public_rel.starts_with(&bundle_rel) {
      bail!(
        "paths.server_bundle \"{}\" overlaps paths.public_dir \"{}\"",
        paths.server_bundle,
        paths.public_dir
      );
    }

    let out_dir = root.join(&out_rel);
    for (key, source) in [
      ("paths.client", &paths.client),
      ("paths.server_entry", &paths.server_entry),
      ("paths.manifest", &paths.manifest),
    ] {
      if lexical(&root.join(source)).starts_with(&out_dir) {
        bail!("paths.out_dir \"{}\" would delete {key} \"{source}\"", paths.out_dir);
      }
    }
    if Path::new("node_modules").starts_with(&out_rel) {
      bail!("paths.out_dir \"{}\" would delete node_modules", paths.out_dir);
    }

    let aliases = config
      .frontend
      .aliases
      .iter()
      .map(|(alias, dir)| (alias.clone(), root.join(dir)))
      .collect();

    Ok(Self {
      project_name: config.project.name.clone(),
      root: root.to_path_buf(),
      frontend: FrontendConfig {
        root: root.to_path_buf(),
        client_root: root.join(&paths.client),
        public_dir: out_dir.join(&public_rel),
        aliases,
        plugins: config.frontend.plugins.clone(),
        vite: config.tools.vite.clone(),
      },
      backend: BackendConfig {
        root: root.to_path_buf(),
        entry: root.join(&paths.server_entry),
        outfile: out_dir.join(&bundle_rel),
        manifest: root.join(&paths.manifest),
        format: config.backend.format,
        minify: config.backend.minify,
        defines: config.backend.defines.clone(),
        esbuild: config.tools.esbuild.clone(),
      },
      out_dir,
    })
  }
}

/// Accept only plain relative paths: no root, no `..`, not empty or `.`.
/// Returns the path with `.` components dropped so prefix checks compare like with like.
fn checked_relative(key: &str, value: &str) -> Result<PathBuf> {
  let mut normal = PathBuf::new();
  for component in Path::new(value).components() {
    match component {
      Component::Normal(part) => normal.push(part),
      Component::CurDir => {}
      _ => bail!("{key} must be a relative path inside the project, got \"{value}\""),
    }
  }
  if normal.as_os_str().is_empty() {
    bail!("{key} must name a subdirectory, got \"{value}\"");
  }
  Ok(normal)
}

/// Resolve `.` and `..` without touching the filesystem.
fn lexical(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        out.pop();
      }
      other => out.push(other),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse_config(toml_str: &str) -> StudioConfig {
    toml::from_str(toml_str).unwrap()
  }

  #[test]
  fn defaults_resolve_under_root() {
    let root = Path::new("/srv/atelier");
    let build = BuildConfig::from_studio_config(&StudioConfig::default(), root).unwrap();
    assert_eq!(build.out_dir, root.join("dist"));
    assert_eq!(build.frontend.client_root, root.join("client"));
    assert_eq!(build.frontend.public_dir, root.join("dist/public"));
    assert_eq!(build.frontend.aliases["@"], root.join("client/src"));
    assert_eq!(build.frontend.aliases["@shared"], root.join("shared"));
    assert_eq!(build.frontend.aliases["@assets"], root.join("attached_assets"));
    assert_eq!(build.backend.entry, root.join("server/index.ts"));
    assert_eq!(build.backend.outfile, root.join("dist/index.cjs"));
    assert_eq!(build.backend.manifest, root.join("package.json"));
    assert_eq!(build.backend.format, BundleFormat::Cjs);
    assert!(build.backend.minify);
  }

  #[test]
  fn custom_layout() {
    let config = parse_config(
      r#"
[paths]
client = "web"
server_entry = "api/main.ts"
out_dir = "build/out"
public_dir = "static"
server_bundle = "server/main.js"
"#,
    );
    let root = Path::new("/srv/atelier");
    let build = BuildConfig::from_studio_config(&config, root).unwrap();
    assert_eq!(build.frontend.public_dir, root.join("build/out/static"));
    assert_eq!(build.backend.outfile, root.join("build/out/server/main.js"));
    assert_eq!(build.backend.entry, root.join("api/main.ts"));
  }

  #[test]
  fn out_dir_escaping_root_errors() {
    for bad in ["..", "../deploy", "/tmp/dist", ".", ""] {
      let config = parse_config(&format!("[paths]\nout_dir = \"{bad}\"\n"));
      let msg = BuildConfig::from_studio_config(&config, Path::new("/srv/atelier"))
        .unwrap_err()
        .to_string();
      assert!(msg.contains("paths.out_dir"), "{bad}: {msg}");
    }
  }

  #[test]
  fn server_bundle_inside_public_dir_errors() {
    let config = parse_config("[paths]\nserver_bundle = \"public/index.cjs\"\n");
    let msg = BuildConfig::from_studio_config(&config, Path::new("/srv/atelier"))
      .unwrap_err()
      .to_string();
    assert!(msg.contains("overlaps"));
  }

  #[test]
  fn dot_prefixed_paths_still_overlap() {
    for (public, bundle) in
      [("./public", "public/index.cjs"), ("public", "./public/index.cjs"), ("./public/.", "public")]
    {
      let config = parse_config(&format!(
        "[paths]\npublic_dir = \"{public}\"\nserver_bundle = \"{bundle}\"\n"
      ));
      let msg = BuildConfig::from_studio_config(&config, Path::new("/srv/atelier"))
        .unwrap_err()
        .to_string();
      assert!(msg.contains("overlaps"), "{public} / {bundle}: {msg}");
    }
  }

  #[test]
  fn dot_prefixed_paths_are_normalised() {
    let config = parse_config("[paths]\nout_dir = \"./dist\"\npublic_dir = \"./public\"\n");
    let root = Path::new("/srv/atelier");
    let build = BuildConfig::from_studio_config(&config, root).unwrap();
    assert_eq!(build.out_dir, root.join("dist"));
    assert_eq!(build.frontend.public_dir, root.join("dist/public"));
  }

  #[test]
  fn out_dir_over_sources_errors() {
    for (out, key) in [
      ("client", "paths.client"),
      ("./server", "paths.server_entry"),
      ("server/", "paths.server_entry"),
      ("node_modules", "node_modules"),
    ] {
      let config = parse_config(&format!("[paths]\nout_dir = \"{out}\"\n"));
      let result = BuildConfig::from_studio_config(&config, Path::new("/srv/atelier"));
      let msg = result.unwrap_err().to_string();
      assert!(msg.contains("would delete") && msg.contains(key), "{out}: {msg}");
    }
  }

  #[test]
  fn out_dir_beside_sources_is_accepted() {
    let config = parse_config("[paths]\nout_dir = \"client-dist\"\n");
    let build = BuildConfig::from_studio_config(&config, Path::new("/srv/atelier")).unwrap();
    assert_eq!(build.out_dir, Path::new("/srv/atelier/client-dist"));
  }
}
