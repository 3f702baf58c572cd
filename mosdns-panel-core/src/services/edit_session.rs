//! 配置树编辑会话
//!
//! 一次会话对应一棵已加载的配置树：行投影、展开状态、当前文件与其
//! 编辑缓冲。缓冲与树解耦，保存成功后只把这一个文件写回树，不整树
//! 重载，兄弟节点与展开状态原样保留。

use std::sync::Arc;

use serde::Serialize;

use crate::error::{PanelError, PanelResult};
use crate::services::PanelContext;
use crate::types::{ConfigTree, ExpandState, FlatItem, ProgressAnimator, FILE_SAVE_CADENCE};

/// 编辑会话所处的阶段，由树与选中文件推导
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditPhase {
    /// 尚无配置树（未加载或加载失败）
    Empty,
    /// 树已加载但没有选中文件（纯目录树）
    Loaded,
    /// 有选中文件，缓冲可与树分叉
    Editing,
}

/// 配置树编辑会话
pub struct EditSession {
    ctx: Arc<PanelContext>,
    tree: ConfigTree,
    expand: ExpandState,
    flat: Vec<FlatItem>,
    dir: String,
    active_file: Option<String>,
    buffer: String,
    save: ProgressAnimator,
}

impl EditSession {
    /// 创建编辑会话
    #[must_use]
    pub fn new(ctx: Arc<PanelContext>) -> Self {
        Self {
            ctx,
            tree: ConfigTree::new(),
            expand: ExpandState::new(),
            flat: Vec::new(),
            dir: String::new(),
            active_file: None,
            buffer: String::new(),
            save: ProgressAnimator::new(FILE_SAVE_CADENCE),
        }
    }

    /// 当前阶段
    #[must_use]
    pub fn phase(&self) -> EditPhase {
        if self.tree.is_empty() {
            EditPhase::Empty
        } else if self.active_file.is_some() {
            EditPhase::Editing
        } else {
            EditPhase::Loaded
        }
    }

    /// 当前可见行
    #[must_use]
    pub fn flat_items(&self) -> &[FlatItem] {
        &self.flat
    }

    /// 当前选中的文件路径
    #[must_use]
    pub fn active_file(&self) -> Option<&str> {
        self.active_file.as_deref()
    }

    /// 编辑缓冲内容
    #[must_use]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// 后端给出的配置目录
    #[must_use]
    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// 配置目录的展示名称
    ///
    /// 后端未给出目录时退回配置文件路径的父目录，两者都没有时给
    /// 占位文案。
    #[must_use]
    pub fn directory_label(&self, config_path: &str) -> String {
        if !self.dir.is_empty() {
            return self.dir.clone();
        }
        if !config_path.is_empty() {
            let parent = match config_path.rfind('/') {
                Some(idx) => &config_path[..idx],
                None => "",
            };
            return if parent.is_empty() {
                "/".to_string()
            } else {
                parent.to_string()
            };
        }
        "未知目录".to_string()
    }

    /// 保存进度条的展示状态
    #[must_use]
    pub fn save_progress(&self) -> &ProgressAnimator {
        &self.save
    }

    /// 推进保存进度条一格，返回当前百分比
    pub fn tick_save(&mut self) -> u8 {
        self.save.tick()
    }

    /// 重新加载整棵配置树
    ///
    /// 先丢弃旧树、展开状态、选中文件和缓冲，再整树替换。加载成功后
    /// 自动选中先序遍历里的第一个文件；失败时会话保持清空，错误向上
    /// 传递，不保留过期的旧树。
    pub async fn reload(&mut self) -> PanelResult<()> {
        self.tree = ConfigTree::new();
        self.expand.reset();
        self.flat.clear();
        self.dir.clear();
        self.active_file = None;
        self.buffer.clear();

        let payload = self.ctx.backend.fetch_config_tree().await?;
        self.dir = payload.dir;
        self.tree = ConfigTree::from_entries(payload.tree);
        self.reflatten();

        if let Some(node) = self.tree.first_file() {
            self.active_file = Some(node.path.clone());
            self.buffer = node.content.clone().unwrap_or_default();
        }
        Ok(())
    }

    /// 选中一个可见文件并以它的当前内容重置缓冲
    ///
    /// 目标必须出现在当前可见行里且不是目录。换文件会静默丢弃未保存
    /// 的缓冲，这里不做脏检查。
    pub fn select_file(&mut self, path: &str) -> PanelResult<()> {
        let item = self
            .flat
            .iter()
            .find(|item| item.path == path)
            .ok_or_else(|| PanelError::FileNotFound(path.to_string()))?;
        if item.is_dir {
            return Err(PanelError::NotAFile(path.to_string()));
        }
        self.buffer = item.content.clone().unwrap_or_default();
        self.active_file = Some(path.to_string());
        Ok(())
    }

    /// 替换编辑缓冲，树不受影响
    pub fn edit(&mut self, text: &str) {
        self.buffer = text.to_string();
    }

    /// 翻转一个目录行的展开状态并重新投影，返回新的展开状态
    ///
    /// 只影响可见行，树、选中文件与缓冲都保持不变。
    pub fn toggle_directory(&mut self, key: &str) -> bool {
        let expanded = self.expand.toggle(key);
        self.reflatten();
        expanded
    }

    /// 保存当前文件
    ///
    /// 成功后把缓冲内容写回树里对应的节点并重新投影；失败时树不动、
    /// 缓冲保留，重试会原样重发。
    pub async fn save(&mut self) -> PanelResult<()> {
        let Some(path) = self.active_file.clone() else {
            return Err(PanelError::NoFileSelected);
        };
        self.save.begin();
        match self.ctx.backend.save_config_file(&path, &self.buffer).await {
            Ok(_) => {
                self.save.finish(true);
                self.tree.set_content(&path, &self.buffer);
                self.reflatten();
                Ok(())
            }
            Err(err) => {
                self.save.finish(false);
                Err(err.into())
            }
        }
    }

    fn reflatten(&mut self) {
        self.flat = self.tree.flatten(&self.expand);
    }
}
