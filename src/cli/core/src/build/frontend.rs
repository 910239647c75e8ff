/* src/cli/core/src/build/frontend.rs */

// Frontend pass: bundles the browser-facing tree with Vite into the public asset directory.
// The Vite config is generated here; a vite.config.* in the project is never loaded.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::config::FrontendConfig;
use super::step::BuildStep;
use crate::clean::remove_dir_if_exists;
use crate::error::{BuildError, Stage};
use crate::shell::{resolve_tool, run_tool};
use crate::ui::{self, DIM, RESET};

/// Location of the generated config, inside node_modules so plugin imports resolve
/// and nothing lands in the output tree.
const GENERATED_CONFIG: &str = "node_modules/.studio-build/vite.config.mjs";

pub struct FrontendStep {
  pub config: FrontendConfig,
}

impl FrontendStep {
  pub fn new(config: FrontendConfig) -> Self {
    Self { config }
  }

  fn config_path(&self) -> PathBuf {
    self.config.root.join(GENERATED_CONFIG)
  }
}

impl BuildStep for FrontendStep {
  fn stage(&self) -> Stage {
    Stage::Frontend
  }

  fn title(&self) -> &'static str {
    "Bundling client"
  }

  fn run(&self) -> Result<(), BuildError> {
    let cfg = &self.config;
    let vite = resolve_tool(&cfg.root, "vite", cfg.vite.as_deref())
      .map_err(|e| BuildError::build(Stage::Frontend, format!("{e:#}")))?;

    let config_path = self.config_path();
    write_generated_config(&config_path, &render_vite_config(cfg))?;

    // Start from an empty public dir even if a previous run was interrupted after cleaning.
    remove_dir_if_exists(&cfg.public_dir, Stage::Frontend)?;

    let args = vec!["build".to_string(), "--config".to_string(), path_string(&config_path)];
    let echo = format!("vite build --config {GENERATED_CONFIG}");
    run_tool(&cfg.root, &vite, &args, "vite build", &echo)
      .map_err(|e| BuildError::build(Stage::Frontend, format!("{e:#}")))?;

    print_public_files(&cfg.root, &cfg.public_dir);
    Ok(())
  }
}

/// Render the Vite config module. Output depends only on `cfg`, so identical inputs give
/// identical files.
pub fn render_vite_config(cfg: &FrontendConfig) -> String {
  let mut out = String::from("// Generated by studio-build. Do not edit.\n");
  for (i, plugin) in cfg.plugins.iter().enumerate() {
    let _ = writeln!(out, "import plugin{i} from {};", js_string(plugin));
  }
  out.push('\n');
  out.push_str("export default {\n");
  let _ = writeln!(out, "  root: {},", js_path(&cfg.client_root));
  let calls: Vec<String> = (0..cfg.plugins.len()).map(|i| format!("plugin{i}()")).collect();
  let _ = writeln!(out, "  plugins: [{}],", calls.join(", "));
  out.push_str("  resolve: {\n    alias: {\n");
  for (alias, dir) in &cfg.aliases {
    let _ = writeln!(out, "      {}: {},", js_string(alias), js_path(dir));
  }
  out.push_str("    },\n  },\n");
  out.push_str("  css: {\n    postcss: {\n      plugins: [],\n    },\n  },\n");
  out.push_str("  build: {\n");
  let _ = writeln!(out, "    outDir: {},", js_path(&cfg.public_dir));
  out.push_str("    emptyOutDir: true,\n  },\n};\n");
  out
}

fn write_generated_config(path: &Path, content: &str) -> Result<(), BuildError> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)
      .map_err(|e| BuildError::io(Stage::Frontend, "failed to create", parent, e))?;
  }
  std::fs::write(path, content)
    .map_err(|e| BuildError::io(Stage::Frontend, "failed to write", path, e))
}

/// JSON string literals are valid JS string literals.
fn js_string(s: &str) -> String {
  serde_json::Value::String(s.to_string()).to_string()
}

fn js_path(path: &Path) -> String {
  js_string(&path_string(path))
}

fn path_string(path: &Path) -> String {
  path.to_string_lossy().into_owned()
}

/// List every emitted file with its size, sorted for stable output.
fn print_public_files(root: &Path, public_dir: &Path) {
  let mut files = Vec::new();
  collect_files(public_dir, &mut files);
  files.sort();
  for file in &files {
    let size = std::fs::metadata(file).map(|m| m.len()).unwrap_or(0);
    let shown = file.strip_prefix(root).unwrap_or(file);
    ui::detail_ok(&format!("{}  {DIM}({}){RESET}", shown.display(), ui::format_size(size)));
  }
  if files.is_empty() {
    ui::detail(&format!("{DIM}no files emitted{RESET}"));
  }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) {
  let Ok(entries) = std::fs::read_dir(dir) else {
    return;
  };
  for entry in entries.flatten() {
    let path = entry.path();
    if entry.file_type().is_ok_and(|ft| ft.is_dir()) {
      collect_files(&path, out);
    } else {
      out.push(path);
    }
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use super::*;

  fn sample_config(root: &Path) -> FrontendConfig {
    FrontendConfig {
      root: root.to_path_buf(),
      client_root: root.join("client"),
      public_dir: root.join("dist/public"),
      aliases: BTreeMap::from([
        ("@".to_string(), root.join("client/src")),
        ("@assets".to_string(), root.join("attached_assets")),
        ("@shared".to_string(), root.join("shared")),
      ]),
      plugins: vec!["@vitejs/plugin-react".to_string(), "@tailwindcss/vite".to_string()],
      vite: None,
    }
  }

  #[test]
  fn config_imports_plugins_in_order() {
    let out = render_vite_config(&sample_config(Path::new("/srv/atelier")));
    let react = out.find("import plugin0 from \"@vitejs/plugin-react\";").unwrap();
    let tailwind = out.find("import plugin1 from \"@tailwindcss/vite\";").unwrap();
    assert!(react < tailwind);
    assert!(out.contains("plugins: [plugin0(), plugin1()],"));
  }

  #[test]
  fn config_sets_aliases_root_and_out_dir() {
    let out = render_vite_config(&sample_config(Path::new("/srv/atelier")));
    assert!(out.contains("root: \"/srv/atelier/client\","));
    assert!(out.contains("\"@\": \"/srv/atelier/client/src\","));
    assert!(out.contains("\"@shared\": \"/srv/atelier/shared\","));
    assert!(out.contains("\"@assets\": \"/srv/atelier/attached_assets\","));
    assert!(out.contains("outDir: \"/srv/atelier/dist/public\","));
    assert!(out.contains("emptyOutDir: true,"));
    assert!(out.contains("plugins: [],"));
  }

  #[test]
  fn config_is_deterministic() {
    let cfg = sample_config(Path::new("/srv/atelier"));
    assert_eq!(render_vite_config(&cfg), render_vite_config(&cfg.clone()));
  }

  #[test]
  fn config_escapes_quotes() {
    let mut cfg = sample_config(Path::new("/srv/at\"elier"));
    cfg.plugins = vec!["weird\"plugin".to_string()];
    let out = render_vite_config(&cfg);
    assert!(out.contains(r#"import plugin0 from "weird\"plugin";"#));
    assert!(out.contains(r#"root: "/srv/at\"elier/client","#));
  }

  #[cfg(unix)]
  #[test]
  fn run_empties_public_dir_and_invokes_vite() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    let stale = root.join("dist/public/stale.js");
    std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
    std::fs::write(&stale, "old").unwrap();

    // Fake vite: records its args, then emits one asset
    let vite = crate::shell::fake_tool(
      root,
      "vite",
      r#"printf '%s\n' "$@" > vite-args.txt
mkdir -p dist/public/assets
echo 'ok' > dist/public/assets/index.js"#,
    );
    let mut cfg = sample_config(root);
    cfg.vite = Some(vite.to_string_lossy().into_owned());

    let step = FrontendStep::new(cfg);
    step.run().unwrap();

    assert!(!stale.exists());
    assert!(root.join("dist/public/assets/index.js").exists());
    let args = std::fs::read_to_string(root.join("vite-args.txt")).unwrap();
    assert!(args.starts_with("build\n--config\n"));
    assert!(args.contains(".studio-build/vite.config.mjs"));
    let generated = std::fs::read_to_string(root.join(GENERATED_CONFIG)).unwrap();
    assert!(generated.contains("@vitejs/plugin-react"));
  }

  #[cfg(unix)]
  #[test]
  fn vite_failure_is_build_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let vite = crate::shell::fake_tool(
      tmp.path(),
      "vite",
      "echo '[vite]: Rollup failed to resolve import \"@/missing\"' >&2\nexit 1",
    );
    let mut cfg = sample_config(tmp.path());
    cfg.vite = Some(vite.to_string_lossy().into_owned());

    let err = FrontendStep::new(cfg).run().unwrap_err();
    assert!(matches!(err, BuildError::Build { stage: Stage::Frontend, .. }));
    assert!(err.to_string().contains("failed to resolve import"));
  }
}
