//! 通用开关槽位的读写

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::{PanelError, PanelResult};
use crate::services::PanelContext;

/// 开关槽位编号，后端固定提供 switch1 到 switch9
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SwitchId(u8);

impl SwitchId {
    /// 最大槽位编号
    pub const MAX: u8 = 9;

    /// 创建槽位编号，超出 1..=9 返回 `None`
    #[must_use]
    pub fn new(slot: u8) -> Option<Self> {
        (1..=Self::MAX).contains(&slot).then_some(Self(slot))
    }

    /// 槽位编号
    #[must_use]
    pub fn slot(&self) -> u8 {
        self.0
    }

    /// 后端使用的槽位标签，如 `switch3`
    #[must_use]
    pub fn tag(&self) -> String {
        format!("switch{}", self.0)
    }
}

impl fmt::Display for SwitchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "switch{}", self.0)
    }
}

/// 开关服务
pub struct SwitchService {
    ctx: Arc<PanelContext>,
}

impl SwitchService {
    /// 创建开关服务
    #[must_use]
    pub fn new(ctx: Arc<PanelContext>) -> Self {
        Self { ctx }
    }

    /// 读取开关值，两端空白已去除
    pub async fn get(&self, id: SwitchId) -> PanelResult<String> {
        let payload = self.ctx.backend.fetch_switch(&id.tag()).await?;
        Ok(payload.value.trim().to_string())
    }

    /// 写入开关值，空白值拒绝提交
    pub async fn set(&self, id: SwitchId, value: &str) -> PanelResult<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(PanelError::EmptySwitchValue);
        }
        let payload = self.ctx.backend.save_switch(&id.tag(), trimmed).await?;
        Ok(payload.value)
    }
}
