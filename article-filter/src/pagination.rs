//! 分页器
//!
//! 按固定页大小切片，并生成紧凑的页码控件：当前页前后各两页的窗口，
//! 始终带上首页和末页，窗口与首末页之间有空隙时插入省略号。

use serde::Serialize;

/// 浏览视图的固定页大小
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// 当前页两侧各显示的页数
const WINDOW_RADIUS: usize = 2;

/// 页码控件
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageControl {
    Previous { page: usize },
    Page { page: usize, active: bool },
    Ellipsis,
    Next { page: usize },
}

/// 分页描述 - 每次派生时重新计算，从不持久化
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PageDescriptor {
    /// 当前页码（从1开始）
    pub current_page: usize,
    pub total_items: usize,
    pub page_size: usize,
    /// 总页数，无数据时为0
    pub total_pages: usize,
    pub controls: Vec<PageControl>,
}

/// 页码归一化：0 视为第 1 页
pub fn normalize_page(page: usize) -> usize {
    page.max(1)
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1))
}

/// 切出第 `page` 页并生成分页描述
///
/// 超出末页时返回空切片而不是报错。
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> (Vec<T>, PageDescriptor) {
    let page = normalize_page(page);
    let page_size = page_size.max(1);

    let start = (page - 1).saturating_mul(page_size);
    let slice = if start < items.len() {
        let end = (start + page_size).min(items.len());
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    (slice, describe(items.len(), page, page_size))
}

/// 只根据数量计算分页描述
pub fn describe(total_items: usize, page: usize, page_size: usize) -> PageDescriptor {
    let page = normalize_page(page);
    let page_size = page_size.max(1);
    let total_pages = total_pages(total_items, page_size);

    PageDescriptor {
        current_page: page,
        total_items,
        page_size,
        total_pages,
        controls: page_controls(page, total_pages),
    }
}

/// 生成页码控件，只有一页或没有数据时不显示
pub fn page_controls(current_page: usize, total_pages: usize) -> Vec<PageControl> {
    if total_pages <= 1 {
        return Vec::new();
    }

    // 超出末页时窗口停在末页
    let current = current_page.clamp(1, total_pages);
    let start = current.saturating_sub(WINDOW_RADIUS).max(1);
    let end = (current + WINDOW_RADIUS).min(total_pages);

    let mut controls = Vec::with_capacity(end - start + 5);

    if current > 1 {
        controls.push(PageControl::Previous { page: current - 1 });
    }

    if start > 1 {
        controls.push(PageControl::Page { page: 1, active: false });
        if start > 2 {
            controls.push(PageControl::Ellipsis);
        }
    }

    for page in start..=end {
        controls.push(PageControl::Page { page, active: page == current });
    }

    if end < total_pages {
        if end < total_pages - 1 {
            controls.push(PageControl::Ellipsis);
        }
        controls.push(PageControl::Page { page: total_pages, active: false });
    }

    if current < total_pages {
        controls.push(PageControl::Next { page: current + 1 });
    }

    controls
}
