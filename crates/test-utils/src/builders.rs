#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use devloop::config::{ProcessSection, RawConfigFile};
use devloop::exec::SupervisorOptions;
use notify::event::{CreateKind, DataChange, MetadataKind, ModifyKind, RemoveKind};
use notify::{Event, EventKind};

/// Builder for `RawConfigFile` to simplify test setup.
#[derive(Debug, Default)]
pub struct RawConfigBuilder {
    config: RawConfigFile,
}

impl RawConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build_cmd(mut self, cmd: &str) -> Self {
        self.config.build = Some(cmd.to_string());
        self
    }

    pub fn run_cmd(mut self, cmd: &str) -> Self {
        self.config.run = Some(cmd.to_string());
        self
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.watch.root = Some(root.into());
        self
    }

    pub fn debounce(mut self, debounce: &str) -> Self {
        self.config.watch.debounce = Some(debounce.to_string());
        self
    }

    pub fn extension(mut self, ext: &str) -> Self {
        self.config
            .watch
            .extensions
            .get_or_insert_with(Vec::new)
            .push(ext.to_string());
        self
    }

    pub fn stop_timeout(mut self, timeout: &str) -> Self {
        self.config.process = ProcessSection {
            stop_timeout: Some(timeout.to_string()),
        };
        self
    }

    pub fn build(self) -> RawConfigFile {
        self.config
    }
}

/// Supervisor options with a short stop timeout, suited to tests.
pub fn supervisor_options(build: &str, run: &str) -> SupervisorOptions {
    SupervisorOptions {
        build: build.to_string(),
        run: run.to_string(),
        stop_timeout: Duration::from_secs(2),
    }
}

/// A content write to `path`.
pub fn modify_event(path: impl AsRef<Path>) -> Event {
    Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
        .add_path(path.as_ref().to_path_buf())
}

/// A metadata-only change (mtime, chmod) to `path`.
pub fn metadata_event(path: impl AsRef<Path>) -> Event {
    Event::new(EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime)))
        .add_path(path.as_ref().to_path_buf())
}

pub fn create_file_event(path: impl AsRef<Path>) -> Event {
    Event::new(EventKind::Create(CreateKind::File)).add_path(path.as_ref().to_path_buf())
}

pub fn create_dir_event(path: impl AsRef<Path>) -> Event {
    Event::new(EventKind::Create(CreateKind::Folder)).add_path(path.as_ref().to_path_buf())
}

pub fn remove_file_event(path: impl AsRef<Path>) -> Event {
    Event::new(EventKind::Remove(RemoveKind::File)).add_path(path.as_ref().to_path_buf())
}
