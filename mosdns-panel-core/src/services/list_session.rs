//! 名单编辑会话
//!
//! 五个名单各占独立槽位，互不干扰：切换名单不会重置其他槽位的缓冲，
//! 已加载的槽位不强制时不重复拉取。

use std::sync::Arc;

use chrono::Utc;
use mosdns_panel_client::SaveListAck;

use crate::error::{PanelError, PanelResult};
use crate::services::PanelContext;
use crate::types::{ListKind, ListSlot};

/// 全部名单的编辑会话
pub struct ListSessions {
    ctx: Arc<PanelContext>,
    slots: [ListSlot; ListKind::ALL.len()],
}

/// 槽位下标与 [`ListKind::ALL`] 的声明顺序一致
fn slot_index(kind: ListKind) -> usize {
    kind as usize
}

impl ListSessions {
    /// 创建名单会话
    #[must_use]
    pub fn new(ctx: Arc<PanelContext>) -> Self {
        Self {
            ctx,
            slots: std::array::from_fn(|_| ListSlot::default()),
        }
    }

    /// 某个名单的当前槽位状态
    #[must_use]
    pub fn slot(&self, kind: ListKind) -> &ListSlot {
        &self.slots[slot_index(kind)]
    }

    fn slot_mut(&mut self, kind: ListKind) -> &mut ListSlot {
        &mut self.slots[slot_index(kind)]
    }

    /// 加载一个名单
    ///
    /// 已加载过的槽位只有在 `force` 时才重新拉取，未保存的编辑也随
    /// 之丢弃。
    pub async fn load(&mut self, kind: ListKind, force: bool) -> PanelResult<()> {
        if self.slot(kind).is_loaded() && !force {
            return Ok(());
        }
        let text = self.ctx.backend.fetch_list(kind.tag()).await?;
        self.slot_mut(kind).fill(&text);
        Ok(())
    }

    /// 整体替换一个名单的缓冲
    pub fn edit(&mut self, kind: ListKind, text: &str) {
        self.slot_mut(kind).edit(text);
    }

    /// 追加一条记录
    ///
    /// 条目先裁剪空白，裁剪后为空的条目拒绝。
    pub fn append(&mut self, kind: ListKind, entry: &str) -> PanelResult<()> {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            return Err(PanelError::EmptyListEntry);
        }
        self.slot_mut(kind).append_line(trimmed);
        Ok(())
    }

    /// 保存一个名单
    ///
    /// 提交裁剪后去掉空行的有序条目；成功后槽位转为干净并记录保存
    /// 时间，失败时缓冲与脏标记保留以便重试。
    pub async fn save(&mut self, kind: ListKind) -> PanelResult<SaveListAck> {
        let values = self.slot(kind).serialize_lines();
        let ack = self.ctx.backend.save_list(kind.tag(), &values).await?;
        self.slot_mut(kind).mark_saved(Utc::now());
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_context, net_err, MockPanelBackend};

    fn sessions() -> (ListSessions, std::sync::Arc<MockPanelBackend>) {
        let (ctx, backend) = create_test_context();
        (ListSessions::new(ctx), backend)
    }

    #[tokio::test]
    async fn load_fills_the_slot_once() {
        let (mut lists, backend) = sessions();
        backend.state.write().await.lists.insert(
            "whitelist".to_string(),
            "example.com\r\ncdn.example\r\n".to_string(),
        );

        lists.load(ListKind::Whitelist, false).await.unwrap();
        assert_eq!(lists.slot(ListKind::Whitelist).content(), "example.com\ncdn.example");
        assert_eq!(lists.slot(ListKind::Whitelist).line_count(), 2);

        // 再次进入不重复拉取
        backend
            .state
            .write()
            .await
            .lists
            .insert("whitelist".to_string(), "changed".to_string());
        lists.load(ListKind::Whitelist, false).await.unwrap();
        assert_eq!(lists.slot(ListKind::Whitelist).content(), "example.com\ncdn.example");

        // 强制刷新丢弃本地内容
        lists.load(ListKind::Whitelist, true).await.unwrap();
        assert_eq!(lists.slot(ListKind::Whitelist).content(), "changed");
    }

    #[tokio::test]
    async fn slots_stay_independent() {
        let (mut lists, backend) = sessions();
        {
            let mut state = backend.state.write().await;
            state.lists.insert("whitelist".to_string(), "a.com".to_string());
            state.lists.insert("blocklist".to_string(), "ads.example".to_string());
        }
        lists.load(ListKind::Whitelist, false).await.unwrap();
        lists.load(ListKind::Blocklist, false).await.unwrap();

        lists.edit(ListKind::Whitelist, "a.com\nb.com");
        assert!(lists.slot(ListKind::Whitelist).is_dirty());
        assert!(!lists.slot(ListKind::Blocklist).is_dirty());
        assert_eq!(lists.slot(ListKind::Blocklist).content(), "ads.example");
    }

    #[tokio::test]
    async fn append_validates_the_entry() {
        let (mut lists, _backend) = sessions();
        assert!(matches!(
            lists.append(ListKind::Greylist, "   "),
            Err(PanelError::EmptyListEntry)
        ));
        lists.append(ListKind::Greylist, "  grey.example  ").unwrap();
        assert_eq!(lists.slot(ListKind::Greylist).content(), "grey.example");
    }

    #[tokio::test]
    async fn save_submits_serialized_lines() {
        let (mut lists, backend) = sessions();
        lists.edit(ListKind::ClientIp, "192.168.1.2\n\n 10.0.0.0/24 \n");

        lists.save(ListKind::ClientIp).await.unwrap();
        let saved = backend.state.read().await.saved_lists.clone();
        assert_eq!(
            saved,
            vec![(
                "client_ip".to_string(),
                vec!["192.168.1.2".to_string(), "10.0.0.0/24".to_string()]
            )]
        );
        assert!(!lists.slot(ListKind::ClientIp).is_dirty());
        assert!(lists.slot(ListKind::ClientIp).last_saved().is_some());
    }

    #[tokio::test]
    async fn failed_save_keeps_the_dirty_buffer() {
        let (mut lists, backend) = sessions();
        lists.edit(ListKind::Ddns, "home.example.org");
        backend.set_error("save_list", net_err("lists")).await;

        assert!(lists.save(ListKind::Ddns).await.is_err());
        assert!(lists.slot(ListKind::Ddns).is_dirty());
        assert!(lists.slot(ListKind::Ddns).last_saved().is_none());

        backend.clear_error("save_list").await;
        lists.save(ListKind::Ddns).await.unwrap();
        assert!(!lists.slot(ListKind::Ddns).is_dirty());
    }
}
