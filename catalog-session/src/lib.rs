use wasm_bindgen::prelude::*;
use web_sys::console;
use utils_common::compression::ListingBundle;

pub mod api;
pub mod config;
pub mod state;
pub mod view;

pub use api::{ApiRequest, ApiResponse, HttpRequest, Ticket};
pub use config::CatalogConfig;
pub use state::{CatalogState, Command, Effect, Mode, Outcome, Slot, Transition};
pub use view::{view, ArticleCard, ArticleDetail, CatalogView, RecommendationView, SummaryView, TextAnalysisView};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// 初始化函数 - 设置错误处理
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// 版本信息
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// 目录会话JS接口
///
/// 页面把用户动作和请求响应以 JSON 命令交给 `dispatch`，按返回的
/// `effects` 发出请求，再用 `view` 取得渲染所需的全部数据。
#[wasm_bindgen]
pub struct CatalogSessionJS {
    state: CatalogState,
}

#[wasm_bindgen]
impl CatalogSessionJS {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<CatalogSessionJS, JsValue> {
        let config = CatalogConfig::from_json(config_json).map_err(|e| log_error(&e.to_string()))?;
        Ok(Self { state: CatalogState::new(config) })
    }

    /// 处理一个命令，返回 `{effects, outcome}`
    #[wasm_bindgen]
    pub fn dispatch(&mut self, command_json: &str) -> Result<JsValue, JsValue> {
        let command: Command = serde_json::from_str(command_json)
            .map_err(|e| log_error(&format!("解析命令失败: {}", e)))?;

        self.apply(command)
    }

    /// 当前视图
    #[wasm_bindgen]
    pub fn view(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&view::view(&self.state))
            .map_err(|e| JsValue::from_str(&format!("序列化视图失败: {}", e)))
    }

    /// 用压缩快照预置工作集
    #[wasm_bindgen]
    pub fn load_bundle(&mut self, data: &[u8]) -> Result<JsValue, JsValue> {
        let bundle = ListingBundle::from_compressed(data).map_err(|e| log_error(&e.to_string()))?;
        self.apply(Command::Seed { articles: bundle.articles })
    }

    /// 是否还有未返回的请求
    #[wasm_bindgen]
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }
}

impl CatalogSessionJS {
    fn apply(&mut self, command: Command) -> Result<JsValue, JsValue> {
        let state = std::mem::take(&mut self.state);
        let transition = state.update(command);
        self.state = transition.state;

        if let Outcome::Failed { error } = &transition.outcome {
            console::log_1(&JsValue::from_str(&error.to_string()));
        }

        let reply = DispatchReply {
            effects: &transition.effects,
            outcome: &transition.outcome,
        };
        serde_wasm_bindgen::to_value(&reply)
            .map_err(|e| JsValue::from_str(&format!("序列化结果失败: {}", e)))
    }
}

#[derive(serde::Serialize)]
struct DispatchReply<'a> {
    effects: &'a [Effect],
    outcome: &'a Outcome,
}

fn log_error(message: &str) -> JsValue {
    console::log_1(&JsValue::from_str(message));
    JsValue::from_str(message)
}
