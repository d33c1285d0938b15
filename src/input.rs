//! URL输入列表
//!
//! 对应界面上的一组URL输入框：可以增删输入框，检测后重置为一个空输入框。

/// 用户输入的URL列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlInputs {
    entries: Vec<String>,
}

impl Default for UrlInputs {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlInputs {
    /// 创建只有一个空输入框的列表
    pub fn new() -> Self {
        Self {
            entries: vec![String::new()],
        }
    }

    /// 用已有URL填充输入框
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = urls.into_iter().map(Into::into).collect();
        if entries.is_empty() {
            Self::new()
        } else {
            Self { entries }
        }
    }

    /// 在末尾添加一个输入框
    pub fn add_field(&mut self, text: impl Into<String>) {
        self.entries.push(text.into());
    }

    /// 删除最后一个输入框，没有输入框时不做任何事
    pub fn delete_field(&mut self) -> Option<String> {
        self.entries.pop()
    }

    /// 修改指定输入框的内容
    pub fn set(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                *entry = text.into();
                true
            }
            None => false,
        }
    }

    /// 当前所有输入框内容
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// 取出待检测的URL并重置输入框
    ///
    /// 返回去掉首尾空白后的非空输入，保持输入顺序；之后只剩一个空输入框。
    pub fn take_for_check(&mut self) -> Vec<String> {
        let urls = self
            .entries
            .iter()
            .map(|entry| entry.trim())
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();
        *self = Self::new();
        urls
    }
}
