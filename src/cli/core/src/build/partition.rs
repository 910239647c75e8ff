/* src/cli/core/src/build/partition.rs */

// Decides, per declared package, whether the server bundle inlines it or leaves it external.
// Membership is by name only: a frontend-only package declared in the manifest is still external.

use std::collections::BTreeSet;

/// Packages inlined into the server bundle unless the project overrides the list.
/// Small, stable or frequently imported ones: fewer file opens at cold start.
pub const DEFAULT_ALLOWLIST: &[&str] = &[
  "@google/generative-ai",
  "axios",
  "connect-pg-simple",
  "cors",
  "date-fns",
  "drizzle-orm",
  "drizzle-zod",
  "express",
  "express-rate-limit",
  "express-session",
  "jsonwebtoken",
  "memorystore",
  "multer",
  "nanoid",
  "nodemailer",
  "openai",
  "passport",
  "passport-local",
  "pg",
  "stripe",
  "uuid",
  "ws",
  "xlsx",
  "zod",
  "zod-validation-error",
];

/// Names the server bundle is allowed to inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allowlist(BTreeSet<String>);

impl Allowlist {
  pub fn new<I, S>(names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self(names.into_iter().map(Into::into).collect())
  }

  pub fn names(&self) -> &BTreeSet<String> {
    &self.0
  }
}

impl Default for Allowlist {
  fn default() -> Self {
    Self::new(DEFAULT_ALLOWLIST.iter().copied())
  }
}

/// Both halves of the manifest: what gets inlined and what stays a runtime import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySplit {
  pub bundled: BTreeSet<String>,
  pub external: BTreeSet<String>,
}

/// `manifest - allowlist`. Allow-list names absent from the manifest have no effect.
pub fn partition(manifest: &BTreeSet<String>, allowlist: &BTreeSet<String>) -> BTreeSet<String> {
  manifest.difference(allowlist).cloned().collect()
}

pub fn split(manifest: &BTreeSet<String>, allowlist: &Allowlist) -> DependencySplit {
  DependencySplit {
    bundled: manifest.intersection(allowlist.names()).cloned().collect(),
    external: partition(manifest, allowlist.names()),
  }
}

/// Allow-list entries the manifest never declares.
pub fn inert_entries<'a>(
  manifest: &'a BTreeSet<String>,
  allowlist: &'a Allowlist,
) -> impl Iterator<Item = &'a String> {
  allowlist.names().difference(manifest)
}
