// ABOUTME: Fixed persona priming turns and prompt templates for the AI painter
// ABOUTME: Request input only enters at the marked injection points (title, detail, comment)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CanvasCraft AI

use crate::llm::{ChatMessage, MessageRole};

/// Text of a priming turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnText {
    /// Hand-authored text
    Fixed(&'static str),
    /// Replaced by the painting detail of the current call
    PaintingDetail,
}

/// One seed-conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimingTurn {
    /// Who speaks
    pub role: MessageRole,
    /// What is said
    pub text: TurnText,
}

impl PrimingTurn {
    const fn user(text: &'static str) -> Self {
        Self {
            role: MessageRole::User,
            text: TurnText::Fixed(text),
        }
    }

    const fn model(text: &'static str) -> Self {
        Self {
            role: MessageRole::Assistant,
            text: TurnText::Fixed(text),
        }
    }
}

/// Persona set-up for the AI painter
pub const PERSONA_INSTRUCTION: &str = "giving you a title about a painting. imagine a painting \
from this title then think about a possible detail. people will give you feedbacks. you have to \
make a reply based on the detail by acting that, you are cevin.AI. you draw that painting. and \
you will make feedback replies. user can say anything based on the comment. it could be positive \
or negative. try to make it funny";

/// Stand-in when a painting has no detail (e.g. captioning failed)
pub const MISSING_DETAIL: &str =
    "A painting whose details are left to your imagination.";

/// Seed conversation for comment replies; the detail is injected as the
/// third turn and the comment is sent after the last one
pub const COMMENT_REPLY_PRIMING: &[PrimingTurn] = &[
    PrimingTurn::user(PERSONA_INSTRUCTION),
    PrimingTurn::model("Great. What is the painting detail"),
    PrimingTurn {
        role: MessageRole::User,
        text: TurnText::PaintingDetail,
    },
    PrimingTurn::model(
        "Great. I will imagine a painting and reply based on this imagined painting detail.",
    ),
];

/// Few-shot seed conversation for title to detail expansion
pub const DETAIL_PRIMING: &[PrimingTurn] = &[
    PrimingTurn::user(
        "You are cevin.AI, a painter. I will give you the title of a painting. Reply with a vivid \
         description of the painting in two or three sentences: subject, composition, colours and \
         mood. Do not add anything else.",
    ),
    PrimingTurn::model("Understood. Give me the title."),
    PrimingTurn::user("A lighthouse in a storm"),
    PrimingTurn::model(
        "A lone white lighthouse stands on black rocks while grey-green waves explode against its \
         base. Its beam cuts a pale gold stripe through a bruised violet sky, and thick impasto \
         strokes make the spray feel loud and cold.",
    ),
    PrimingTurn::user("Morning market in Dhaka"),
    PrimingTurn::model(
        "Rickshaws and fruit stalls crowd a narrow street washed in soft orange dawn light. Piles \
         of mangoes and marigolds glow against faded blue walls, and loose watercolour edges let \
         the bustle blur into warm haze.",
    ),
];

/// Render priming turns into chat messages, injecting `detail`
#[must_use]
pub fn render_priming(turns: &[PrimingTurn], detail: &str) -> Vec<ChatMessage> {
    turns
        .iter()
        .map(|turn| {
            let text = match turn.text {
                TurnText::Fixed(text) => text,
                TurnText::PaintingDetail => detail,
            };
            ChatMessage::new(turn.role, text)
        })
        .collect()
}

/// One-shot prompt embedding persona, detail and comment
#[must_use]
pub fn single_prompt_reply(detail: &str, comment: &str) -> String {
    format!(
        "suppose you are Cevin.AI. You are an AI model which can generate paint and give feedback \
         based on your generation. I am giving you a prompt - {detail}. now you have to imagine a \
         painting detail based on the context. now based on your imaginary detail about that \
         painting, generate a funny and energetic positive reply for this comment - {comment}. \
         make the reply simple and short"
    )
}
