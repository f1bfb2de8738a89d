use regex::{Regex, RegexBuilder};

/// Case-insensitive matcher for link-preview crawler user agents.
#[derive(Debug, Clone)]
pub struct BotMatcher {
    pattern: Regex,
}

impl BotMatcher {
    pub fn new<S: AsRef<str>>(agents: &[S]) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = agents
            .iter()
            .map(|agent| regex::escape(agent.as_ref()))
            .collect();
        let pattern = RegexBuilder::new(&format!("({})", alternatives.join("|")))
            .case_insensitive(true)
            .build()?;
        Ok(Self { pattern })
    }

    pub fn is_bot(&self, user_agent: &str) -> bool {
        self.pattern.is_match(user_agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use press_kit_core::config::DEFAULT_BOT_USER_AGENTS;

    fn matcher() -> BotMatcher {
        BotMatcher::new(DEFAULT_BOT_USER_AGENTS).unwrap()
    }

    #[test]
    fn test_known_crawlers_match() {
        let m = matcher();
        assert!(m.is_bot("facebookexternalhit/1.1 (+http://www.facebook.com/externalhit_uatext.php)"));
        assert!(m.is_bot("WhatsApp/2.23.20.0 A"));
        assert!(m.is_bot("Twitterbot/1.0"));
        assert!(m.is_bot("Mozilla/5.0 (compatible; Discordbot/2.0; +https://discordapp.com)"));
        assert!(m.is_bot("telegrambot (like TwitterBot)"));
    }

    #[test]
    fn test_browsers_do_not_match() {
        let m = matcher();
        assert!(!m.is_bot(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
        ));
        assert!(!m.is_bot(""));
    }

    #[test]
    fn test_agents_are_literal() {
        let m = BotMatcher::new(&["Bot.v1"]).unwrap();
        assert!(m.is_bot("Bot.v1"));
        assert!(!m.is_bot("BotXv1"));
    }
}
