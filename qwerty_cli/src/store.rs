//! 配置与进度文件（JSON）。
//!
//! 进度写入采用“临时文件 + rename”，中途退出不会留下半个文件。

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::debug;
use qwerty_core::{config::Config, model::Progress};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid json in {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn json_err(path: &Path) -> impl FnOnce(serde_json::Error) -> StoreError + '_ {
    move |source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    }
}

/// 读取配置；文件不存在时使用默认配置。
pub fn load_config(path: &Path) -> Result<Config, StoreError> {
    if !path.exists() {
        debug!("no config at {:?}, using defaults", path);
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path).map_err(io_err(path))?;
    serde_json::from_str(&content).map_err(json_err(path))
}

pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取进度；文件不存在时返回 None。
    pub fn load(&self) -> Result<Option<Progress>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(io_err(&self.path))?;
        let progress = serde_json::from_str(&content).map_err(json_err(&self.path))?;
        Ok(Some(progress))
    }

    pub fn save(&self, progress: &Progress) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(progress).map_err(json_err(&self.path))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err(parent))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err(&tmp))?;
        fs::rename(&tmp, &self.path).map_err(io_err(&self.path))?;
        debug!("progress saved to {:?}", self.path);
        Ok(())
    }
}
