//! Ordered response rules. The first rule that produces a reply wins; the
//! order below is part of the contract because keyword sets overlap
//! ("prevent smoking" is a prevention question, not a smoking one).

use crate::models::{ChatContext, Disease, DrStage};

use super::keywords::{
    contains_any, detect_disease, DISEASE_MENU_PHRASES, ELABORATION_PHRASES, GREETING_KEYWORDS,
    PREVENTION_KEYWORDS, SMOKING_KEYWORDS,
};
use super::responses::{self, Topic};

/// A user message prepared for rule evaluation.
#[derive(Debug)]
pub struct Query<'a> {
    text: String,
    context: Option<&'a ChatContext>,
    keyword_disease: Option<Disease>,
}

impl<'a> Query<'a> {
    pub fn new(user_text: &str, context: Option<&'a ChatContext>) -> Self {
        let text = user_text.to_lowercase();
        let keyword_disease = detect_disease(&text);
        Self {
            text,
            context,
            keyword_disease,
        }
    }

    fn has(&self, keywords: &[&str]) -> bool {
        contains_any(&self.text, keywords)
    }

    /// Context usable for a follow-up: only when no disease was named and the
    /// user asked to hear more.
    fn follow_up_context(&self) -> Option<&'a ChatContext> {
        if self.keyword_disease.is_some() || !self.has(ELABORATION_PHRASES) {
            return None;
        }
        self.context
    }

    /// Disease named in the text, else the one implied by the last scan.
    pub fn disease(&self) -> Option<Disease> {
        self.keyword_disease
            .or_else(|| context_disease(self.follow_up_context()))
    }

    /// Disease implied by the last scan for a bare symptoms/treatment
    /// question. Graded stages only.
    fn topic_disease(&self) -> Option<Disease> {
        if self.keyword_disease.is_some() || self.topic() == Topic::Overview {
            return None;
        }
        context_disease(self.context)
    }

    fn topic(&self) -> Topic {
        if self.text.contains("symptoms") {
            Topic::Symptoms
        } else if self.text.contains("treatment") {
            Topic::Treatment
        } else {
            Topic::Overview
        }
    }
}

fn context_disease(context: Option<&ChatContext>) -> Option<Disease> {
    context
        .and_then(ChatContext::stage)
        .and_then(|stage| stage.disease())
}

pub type Matcher = fn(&Query<'_>) -> Option<&'static str>;

/// A named step in the resolution chain.
pub struct Rule {
    pub name: &'static str,
    pub matcher: Matcher,
}

pub static RULES: &[Rule] = &[
    Rule {
        name: "prevention",
        matcher: |q| q.has(PREVENTION_KEYWORDS).then_some(responses::PREVENTION_TIPS),
    },
    Rule {
        name: "smoking",
        matcher: |q| q.has(SMOKING_KEYWORDS).then_some(responses::SMOKING_RISKS),
    },
    Rule {
        name: "disease_menu",
        matcher: |q| q.has(DISEASE_MENU_PHRASES).then_some(responses::DISEASE_MENU),
    },
    Rule {
        name: "context_reassurance",
        matcher: |q| {
            q.follow_up_context()
                .filter(|ctx| ctx.stage() == Some(DrStage::NoDr))
                .map(|_| responses::NO_DR_REASSURANCE)
        },
    },
    Rule {
        name: "disease_topic",
        matcher: |q| {
            q.disease()
                .and_then(|disease| responses::disease_reply(disease, q.topic()))
        },
    },
    Rule {
        name: "greeting",
        matcher: |q| q.has(GREETING_KEYWORDS).then_some(responses::GREETING),
    },
    Rule {
        name: "context_topic",
        matcher: |q| {
            q.topic_disease()
                .and_then(|disease| responses::disease_reply(disease, q.topic()))
        },
    },
    Rule {
        name: "fallback",
        matcher: |_| Some(responses::FALLBACK),
    },
];

/// Resolve a reply and the name of the rule that produced it.
pub fn evaluate(user_text: &str, context: Option<&ChatContext>) -> (&'static str, &'static str) {
    let query = Query::new(user_text, context);
    RULES
        .iter()
        .find_map(|rule| (rule.matcher)(&query).map(|reply| (rule.name, reply)))
        .unwrap_or(("fallback", responses::FALLBACK))
}
