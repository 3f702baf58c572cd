//! 配置偏好管理
//!
//! 读取与保存后端的字符串设置表，本地始终持有规整后的完整记录。

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::PanelResult;
use crate::services::PanelContext;
use crate::types::{parse_bool, ProgressAnimator, SettingsRecord, SETTINGS_SAVE_CADENCE};

/// 偏好设置服务
pub struct SettingsService {
    ctx: Arc<PanelContext>,
    record: SettingsRecord,
    /// 后端原样返回的设置表，规整字段之外的键也保留
    raw: HashMap<String, String>,
    save: ProgressAnimator,
}

impl SettingsService {
    /// 创建偏好设置服务
    #[must_use]
    pub fn new(ctx: Arc<PanelContext>) -> Self {
        Self {
            ctx,
            record: SettingsRecord::default(),
            raw: HashMap::new(),
            save: ProgressAnimator::new(SETTINGS_SAVE_CADENCE),
        }
    }

    /// 当前规整后的设置记录
    #[must_use]
    pub fn record(&self) -> &SettingsRecord {
        &self.record
    }

    /// 读取规整字段之外的原始设置值
    #[must_use]
    pub fn raw_value(&self, key: &str) -> Option<&str> {
        self.raw.get(key).map(String::as_str)
    }

    /// 日志自动刷新开关，未设置时默认开启
    #[must_use]
    pub fn auto_refresh_logs(&self) -> bool {
        self.raw_value("autoRefreshLogs")
            .map_or(true, |value| parse_bool(value, true))
    }

    /// 四个偏好字段是否仍为默认值
    #[must_use]
    pub fn using_default_preferences(&self) -> bool {
        self.record.is_default()
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

    /// 从后端拉取设置并规整
    pub async fn refresh(&mut self) -> PanelResult<()> {
        let payload = self.ctx.backend.fetch_settings().await?;
        self.record = SettingsRecord::normalize(&payload.settings);
        self.raw = payload.settings;
        Ok(())
    }

    /// 保存一份偏好草稿
    ///
    /// 草稿先规整再提交，本地记录在请求前就更新，失败时保留草稿以便
    /// 原样重试。后端返回的设置表为最终事实。
    pub async fn save(&mut self, draft: &SettingsRecord) -> PanelResult<&SettingsRecord> {
        self.record = SettingsRecord::normalize(&draft.to_payload());
        self.save.begin();
        match self.ctx.backend.save_settings(&self.record.to_payload()).await {
            Ok(payload) => {
                self.save.finish(true);
                if !payload.settings.is_empty() {
                    self.record = SettingsRecord::normalize(&payload.settings);
                    self.raw = payload.settings;
                }
                Ok(&self.record)
            }
            Err(err) => {
                self.save.finish(false);
                Err(err.into())
            }
        }
    }
}
