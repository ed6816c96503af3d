//! Testing utilities for the freshup workspace
//!
//! Temporary project fixtures and canned Fresh 1.x sources.

#![allow(missing_docs)]

use freshup_core::UpgradeConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const LEGACY_DENO_JSON: &str = r#"{
  "lock": false,
  "tasks": {
    "check": "deno fmt --check && deno lint",
    "start": "deno run -A --watch=static/,routes/ dev.ts",
    "build": "deno run -A dev.ts build",
    "preview": "deno run -A main.ts",
    "update": "deno run -A -r https://fresh.deno.dev/update ."
  },
  "imports": {
    "$fresh/": "https://deno.land/x/fresh@1.7.3/",
    "preact": "https://esm.sh/preact@10.22.0",
    "preact/": "https://esm.sh/preact@10.22.0/",
    "@preact/signals": "https://esm.sh/*@preact/signals@1.2.2",
    "@preact/signals-core": "https://esm.sh/*@preact/signals-core@1.5.1"
  },
  "compilerOptions": {
    "jsx": "react-jsx",
    "jsxImportSource": "preact"
  }
}
"#;

pub const LEGACY_ROUTE: &str = r#"/** @jsx h */
import { h } from "preact";
import { Handlers, PageProps } from "$fresh/server.ts";

export const handler: Handlers = {
  async GET(req, ctx) {
    const user = await load(req.url);
    if (!user) {
      return ctx.renderNotFound();
    }
    return ctx.render(user);
  },
};

export default function Page({ data }: PageProps) {
  return <h1>{data.name}</h1>;
}
"#;

pub const LEGACY_API_ROUTE: &str = r#"export const handler = (req) => {
  return new Response(req.url);
};
"#;

pub const LEGACY_ISLAND: &str = r#"import { h } from "preact";
import { IS_BROWSER } from "$fresh/runtime.ts";

export default function Counter() {
  return <button disabled={!IS_BROWSER}>+1</button>;
}
"#;

pub const BROKEN_ROUTE: &str = "export const handler = {\n  GET(req, ctx) {\n";

/// Temporary project directory
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// A small Fresh 1.x project: manifest, two routes and an island
    pub fn fresh_one() -> Self {
        Self::new()
            .with_file("deno.json", LEGACY_DENO_JSON)
            .with_file("routes/index.tsx", LEGACY_ROUTE)
            .with_file("routes/api/echo.ts", LEGACY_API_ROUTE)
            .with_file("islands/Counter.tsx", LEGACY_ISLAND)
    }

    pub fn with_file(self, relative: &str, content: &str) -> Self {
        self.write(relative, content);
        self
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Config for this project with formatting off
    pub fn config(&self) -> UpgradeConfig {
        UpgradeConfig::new(self.root())
            .with_format(false)
            .with_concurrency(4)
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}
