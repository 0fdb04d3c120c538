//! Interface strings for the two supported interface languages.

use vote_core::model::LanguageCode;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UiLang {
    #[default]
    Zh,
    En,
}

impl UiLang {
    /// Interface language for an annotation language; anything but `zh` gets English.
    #[must_use]
    pub fn for_code(code: Option<&LanguageCode>) -> Self {
        match code.map(LanguageCode::as_str) {
            Some("zh") | None => Self::Zh,
            Some(_) => Self::En,
        }
    }

    #[must_use]
    pub fn text(self) -> &'static UiText {
        match self {
            Self::Zh => &ZH,
            Self::En => &EN,
        }
    }
}

pub struct UiText {
    lang: UiLang,
    pub login_title: &'static str,
    pub login_prompt: &'static str,
    pub login_submit: &'static str,
    pub login_rejected: &'static str,
    pub choose_language_title: &'static str,
    pub confirm: &'static str,
    pub language_label: &'static str,
    pub switch_language: &'static str,
    pub tab_annotate: &'static str,
    pub tab_leaderboard: &'static str,
    pub sample_count: &'static str,
    pub avg_len_a: &'static str,
    pub avg_len_b: &'static str,
    pub length_unit: &'static str,
    pub complete: &'static str,
    pub download_mine: &'static str,
    pub question: &'static str,
    pub version_a: &'static str,
    pub version_b: &'static str,
    pub vote_a: &'static str,
    pub tie: &'static str,
    pub vote_b: &'static str,
    pub leaderboard: &'static str,
    pub no_data: &'static str,
    pub export: &'static str,
    pub download_stats: &'static str,
    pub download_raw: &'static str,
    pub admin: &'static str,
    pub download_all: &'static str,
    pub no_export: &'static str,
    pub saved_to: &'static str,
    pub loading: &'static str,
    pub col_rank: &'static str,
    pub col_email: &'static str,
    pub col_completed: &'static str,
    pub col_avg_time: &'static str,
    pub col_voters: &'static str,
    pub col_avg_score: &'static str,
    pub col_version_a: &'static str,
    pub col_tie: &'static str,
    pub col_version_b: &'static str,
}

impl UiText {
    #[must_use]
    pub fn question_heading(&self, position: usize, total: usize) -> String {
        format!("{} {position}/{total}", self.question)
    }

    #[must_use]
    pub fn finish_time(&self, secs: u64, percentile: f64) -> String {
        if self.lang == UiLang::Zh {
            format!("🏆 你用时 {secs} 秒，同语言同事中有 {percentile:.1}% 比你更快完成！")
        } else {
            format!(
                "🏆 You completed in {secs} seconds; {percentile:.1}% of your colleagues in the same language finished faster!"
            )
        }
    }

    #[must_use]
    pub fn my_rank(&self, rank: u32, participants: usize, completed: u32, avg: &str) -> String {
        if self.lang == UiLang::Zh {
            format!(
                "🏆 你的排名: 第{rank}名 / 共{participants}人，已完成{completed}题，平均每题用时{avg}秒"
            )
        } else {
            format!(
                "🏆 Your rank: {rank} out of {participants}, completed {completed} questions, average time per question: {avg} seconds"
            )
        }
    }

    #[must_use]
    pub fn collected_for(&self, code: &LanguageCode) -> String {
        if self.lang == UiLang::Zh {
            format!("当前语言({code})已收集标注数据:")
        } else {
            format!("Collected annotation data for current language ({code}):")
        }
    }
}

static ZH: UiText = UiText {
    lang: UiLang::Zh,
    login_title: "⚔️  AB Battle — 登录",
    login_prompt: "请输入邮箱开始",
    login_submit: "进入",
    login_rejected: "邮箱格式不正确",
    choose_language_title: "⚔️  AB Battle — 选择语言 / Choose Language",
    confirm: "确认 / Confirm",
    language_label: "语言",
    switch_language: "🔄 切换语言 / Switch Language",
    tab_annotate: "📝 标注任务",
    tab_leaderboard: "📊 排行榜 / 进度",
    sample_count: "文本样本数量",
    avg_len_a: "版本A平均长度",
    avg_len_b: "版本B平均长度",
    length_unit: "字",
    complete: "🎉 本语言全部完成！",
    download_mine: "📥 下载我的标注 CSV",
    question: "题目",
    version_a: "🔵 版本A",
    version_b: "🔵 版本B",
    vote_a: "👍 版本A 更好",
    tie: "🤝 平分",
    vote_b: "👍 版本B 更好",
    leaderboard: "⏱ 标注速度排行榜",
    no_data: "暂无标注数据",
    export: "📊 数据导出",
    download_stats: "📥 下载题目评分统计CSV",
    download_raw: "📥 下载所有原始标注数据",
    admin: "管理员功能",
    download_all: "📥 导出所有语言的标注数据",
    no_export: "暂无标注数据可导出",
    saved_to: "已保存到",
    loading: "加载中...",
    col_rank: "排名",
    col_email: "邮箱",
    col_completed: "已完成题数",
    col_avg_time: "平均每题用时(秒)",
    col_voters: "投票人数",
    col_avg_score: "平均得分",
    col_version_a: "版本A更好",
    col_tie: "平分",
    col_version_b: "版本B更好",
};

static EN: UiText = UiText {
    lang: UiLang::En,
    login_title: "⚔️  AB Battle — Sign in",
    login_prompt: "Enter your email to start",
    login_submit: "Enter",
    login_rejected: "Invalid email format",
    choose_language_title: "⚔️  AB Battle — Choose Language / 选择语言",
    confirm: "Confirm / 确认",
    language_label: "Language",
    switch_language: "🔄 Switch Language / 切换语言",
    tab_annotate: "📝 Annotation Task",
    tab_leaderboard: "📊 Leaderboard / Progress",
    sample_count: "sample count",
    avg_len_a: "Version A avg length",
    avg_len_b: "Version B avg length",
    length_unit: "chars",
    complete: "🎉 All completed for this language!",
    download_mine: "📥 Download My Annotations CSV",
    question: "Question",
    version_a: "🔵 Version A",
    version_b: "🔵 Version B",
    vote_a: "👍 Version A is better",
    tie: "🤝 Tie",
    vote_b: "👍 Version B is better",
    leaderboard: "⏱ Annotation Speed Leaderboard",
    no_data: "No annotation data available",
    export: "📊 Data Export",
    download_stats: "📥 Download Question Stats CSV",
    download_raw: "📥 Download All Raw Annotation Data",
    admin: "Admin Functions",
    download_all: "📥 Export Annotations for All Languages",
    no_export: "No annotation data available for export",
    saved_to: "Saved to",
    loading: "Loading...",
    col_rank: "Rank",
    col_email: "Email",
    col_completed: "Completed",
    col_avg_time: "Avg Time(s)",
    col_voters: "Voters",
    col_avg_score: "AvgScore",
    col_version_a: "VersionA",
    col_tie: "Tie",
    col_version_b: "VersionB",
};
