// Fixture directories with fake external tools for CLI tests
//
// The fake profiler copies `tools/profile.out` into the scratch directory
// and the fake objdump prints `tools/listing.txt`, so a test changes what
// the "tool" reports by rewriting those files.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const PROFILE: &str = "\
events: Ir
fn=(1) foo
0 10
cfn=(2) bar
0 100
1 7
fn=(2)
0 0
summary: 117
";

pub const LISTING: &str = "\
0000000000401126 <add>:
  401126:\tlea    (%rdi,%rsi,1),%eax
  401129:\tretq

0000000000401130 <main>:
  401130:\tcallq  401126 <add>
  401135:\tretq

";

pub struct Workspace {
    root: TempDir,
}

impl Workspace {
    /// Fixture directory `fixtures/` with a `perfgold.toml` pointing at the
    /// fake tools and at `build/`
    pub fn new(kind: &str) -> Self {
        let root = tempfile::tempdir().unwrap();
        for dir in ["fixtures", "tools", "build"] {
            fs::create_dir_all(root.path().join(dir)).unwrap();
        }

        let ws = Self { root };
        ws.script("valgrind", "cp \"$(dirname \"$0\")/profile.out\" callgrind.out");
        ws.script("objdump", "cat \"$(dirname \"$0\")/listing.txt\"");
        ws.set_profile(PROFILE);
        ws.set_listing(LISTING);
        fs::write(ws.path("build/add_bench"), b"").unwrap();
        fs::write(ws.path("build/lib.o"), b"").unwrap();

        let config = format!(
            "kind = \"{}\"\nbuild_root = \"../build\"\ndisable_aslr = false\n\n[tools]\nvalgrind = \"{}\"\nobjdump = \"{}\"\n",
            kind,
            ws.path("tools/valgrind").display(),
            ws.path("tools/objdump").display(),
        );
        fs::write(ws.path("fixtures/perfgold.toml"), config).unwrap();
        ws
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    pub fn fixtures(&self) -> PathBuf {
        self.path("fixtures")
    }

    pub fn case(&self, id: &str, json: &str) {
        fs::write(self.fixtures().join(format!("{}.json", id)), json).unwrap();
    }

    pub fn set_profile(&self, text: &str) {
        fs::write(self.path("tools/profile.out"), text).unwrap();
    }

    pub fn set_listing(&self, text: &str) {
        fs::write(self.path("tools/listing.txt"), text).unwrap();
    }

    pub fn script(&self, name: &str, body: &str) {
        let path = self.path(&format!("tools/{}", name));
        write_executable(&path, &format!("#!/bin/sh\n{}\n", body));
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap()
    }
}

fn write_executable(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}
