use crate::error::{AppResult, ConfigError};
use serde::{Deserialize, Serialize};

/// 排版开关
///
/// 每个字段对应流水线中的一个阶段；开关关闭（或数量为 0）即跳过该阶段。
/// TOML 中的键名与网页版保持一致（camelCase）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FormatConfig {
    /// 把同一行里用 Tab 隔开的选项拆成独立段落
    pub break_tabs_to_newlines: bool,
    /// 给选项标签和加粗文字上色
    pub color_bold_text: bool,
    /// 上色用的颜色，`#RRGGBB` 或 `RRGGBB`
    pub bold_color: String,
    /// 合并多余空格
    pub remove_extra_spaces: bool,
    /// 图片居中
    pub center_images: bool,
    /// 删除空行
    pub remove_empty_lines: bool,
    /// 每道题后插入的点线行数
    pub dot_lines_count: u32,
}

impl FormatConfig {
    /// 校验配置
    pub fn validate(&self) -> AppResult<()> {
        if self.color_bold_text {
            self.bold_color_hex()?;
        }
        Ok(())
    }

    /// 去掉 `#` 并转为大写的颜色值，例如 `#c00000` -> `C00000`
    pub fn bold_color_hex(&self) -> AppResult<String> {
        let hex = self.bold_color.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::InvalidColor {
                value: self.bold_color.clone(),
            }
            .into());
        }
        Ok(hex.to_ascii_uppercase())
    }

    /// 是否没有任何阶段会执行
    pub fn is_noop(&self) -> bool {
        !self.break_tabs_to_newlines
            && !self.color_bold_text
            && !self.remove_extra_spaces
            && !self.center_images
            && !self.remove_empty_lines
            && self.dot_lines_count == 0
    }
}
