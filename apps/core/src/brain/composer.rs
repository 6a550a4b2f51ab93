//! Response Composer - turns a classified intent into a markdown reply and
//! quick-reply suggestions.
//!
//! Templates interpolate fields from the static [`PortfolioProfile`]. The
//! composer never mutates its inputs; the updated context is returned.

use std::sync::Arc;

use super::context::ConversationContext;
use super::intent::{IntentResult, Topic};
use crate::error::AppError;
use crate::models::{Icon, PortfolioProfile, Project, QuickReply};

/// Output of a single composition
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedReply {
    /// Markdown reply text
    pub content: String,
    /// Suggested follow-ups, never empty
    pub quick_replies: Vec<QuickReply>,
    /// Context after this turn
    pub context: ConversationContext,
}

fn skills_reply() -> QuickReply {
    QuickReply::new("Skills", "What are your skills?", Icon::Zap)
}

fn frontend_reply() -> QuickReply {
    QuickReply::new("Frontend Skills", "What are your frontend skills?", Icon::Code)
}

fn backend_reply() -> QuickReply {
    QuickReply::new("Backend Skills", "What are your backend skills?", Icon::Code)
}

fn projects_reply() -> QuickReply {
    QuickReply::new("View Projects", "Show me your projects", Icon::Briefcase)
}

fn contact_reply() -> QuickReply {
    QuickReply::new("Contact", "How can I contact you?", Icon::Mail)
}

/// The recovery option attached to every degraded reply.
pub fn start_over_reply() -> QuickReply {
    QuickReply::new("Start Over", "Start over", Icon::Rotate)
}

/// The three top-level quick replies shown on a fresh session.
pub fn welcome_quick_replies() -> Vec<QuickReply> {
    vec![
        QuickReply::new(
            "Skills & Experience",
            "What are your skills and experience?",
            Icon::Zap,
        ),
        QuickReply::new("View Projects", "Show me your projects", Icon::Code),
        QuickReply::new("Contact Info", "How can I contact you?", Icon::Mail),
    ]
}

fn menu_quick_replies() -> Vec<QuickReply> {
    vec![skills_reply(), projects_reply(), contact_reply()]
}

/// Composes replies from the portfolio profile
#[derive(Debug, Clone)]
pub struct ResponseComposer {
    profile: Arc<PortfolioProfile>,
}

impl ResponseComposer {
    pub fn new(profile: Arc<PortfolioProfile>) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &PortfolioProfile {
        &self.profile
    }

    /// Canonical welcome text shown on a fresh session and after a reset
    pub fn welcome_text(&self) -> String {
        format!(
            "Hi! I'm an AI assistant for {}'s portfolio. I can help you explore their:\n\n\
• Experience and skills\n\
• Projects and achievements\n\
• Contact information\n\n\
What would you like to know about?",
            self.profile.name
        )
    }

    /// The opening turn of every session
    pub fn welcome(&self) -> ComposedReply {
        ComposedReply {
            content: self.welcome_text(),
            quick_replies: welcome_quick_replies(),
            context: ConversationContext::default(),
        }
    }

    /// Compose the reply for one user turn.
    ///
    /// `context` is the state before the turn; the returned reply carries the
    /// state after it.
    pub fn compose(&self, intent: &IntentResult, context: &ConversationContext) -> ComposedReply {
        let mut next = context.record(intent);

        let (content, quick_replies) = match intent.topic {
            Topic::Skills => self.skills(intent.subtopic(), &mut next),
            Topic::Projects => self.projects(intent.subtopic(), &mut next),
            Topic::Contact => self.contact(),
            Topic::Personal => self.personal(),
            Topic::Reset => return self.welcome(),
            Topic::Unknown => self.unknown(context, &next),
        };

        ComposedReply {
            content,
            quick_replies,
            context: next,
        }
    }

    fn skills(
        &self,
        subtopic: Option<&str>,
        ctx: &mut ConversationContext,
    ) -> (String, Vec<QuickReply>) {
        let skills = &self.profile.skills;
        match subtopic {
            Some("frontend") => {
                ctx.mention_skills(&skills.frontend);
                (
                    format!(
                        "In frontend development, I specialize in {}. I focus on creating responsive, \
accessible, and performant user interfaces with modern web technologies.",
                        skills.frontend.join(", ")
                    ),
                    vec![backend_reply(), projects_reply()],
                )
            }
            Some("backend") => {
                ctx.mention_skills(&skills.backend);
                (
                    format!(
                        "For backend development, I work with {}. I have experience building scalable \
APIs and working with various database systems.",
                        skills.backend.join(", ")
                    ),
                    vec![frontend_reply(), projects_reply()],
                )
            }
            _ => {
                ctx.mention_skills(
                    skills
                        .frontend
                        .iter()
                        .chain(&skills.backend)
                        .chain(&skills.devops),
                );
                (
                    format!(
                        "I work with various technologies across the stack:\n\n\
**Frontend:** {}\n\
**Backend:** {}\n\
**DevOps:** {}\n\n\
Would you like to know more about any specific area?",
                        skills.frontend.join(", "),
                        skills.backend.join(", "),
                        skills.devops.join(", ")
                    ),
                    vec![frontend_reply(), backend_reply(), projects_reply()],
                )
            }
        }
    }

    fn projects(
        &self,
        subtopic: Option<&str>,
        ctx: &mut ConversationContext,
    ) -> (String, Vec<QuickReply>) {
        if let Some(project) = subtopic.and_then(|key| self.profile.project_for_key(key)) {
            ctx.mention_projects([&project.name]);
            return (
                project_detail(project),
                vec![
                    QuickReply::new(
                        "Other Projects",
                        "What other projects have you worked on?",
                        Icon::Briefcase,
                    ),
                    QuickReply::new("Tech Stack", "Tell me more about the tech stack", Icon::Code),
                ],
            );
        }

        ctx.mention_projects(self.profile.projects.iter().map(|p| &p.name));
        let summary = self
            .profile
            .projects
            .iter()
            .map(|p| {
                format!(
                    "**{}**\n{}\n**Tech Stack:** {}\n",
                    p.name,
                    p.description,
                    p.tech_stack.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let options = self
            .profile
            .projects
            .iter()
            .map(|p| {
                QuickReply::new(
                    p.name.clone(),
                    format!("Tell me more about {}", p.name),
                    Icon::Briefcase,
                )
            })
            .collect::<Vec<_>>();

        let options = if options.is_empty() {
            menu_quick_replies()
        } else {
            options
        };
        (
            format!("Here are some of my key projects:\n\n{}", summary),
            options,
        )
    }

    fn contact(&self) -> (String, Vec<QuickReply>) {
        let p = &self.profile;
        (
            format!(
                "You can reach me through:\n\n\
📧 **Email:** {}\n\
🔗 **LinkedIn:** {}\n\
🐙 **GitHub:** {}\n\
🌐 **Website:** {}\n\n\
Feel free to connect for professional opportunities or collaborations!",
                p.email, p.linkedin, p.github, p.website
            ),
            vec![
                QuickReply::new("View Projects", "Show me your projects first", Icon::Briefcase),
                QuickReply::new("Experience", "Tell me about your experience", Icon::BookOpen),
            ],
        )
    }

    fn personal(&self) -> (String, Vec<QuickReply>) {
        let p = &self.profile;
        let mut content = format!(
            "I'm {}, a {} based in {}.\n\n{}",
            p.name, p.role, p.location, p.about
        );
        if !p.experience.is_empty() {
            content.push_str("\n\n**Experience:**");
            for job in &p.experience {
                content.push_str(&format!("\n- **{}** at {} ({})", job.role, job.company, job.period));
                for achievement in &job.achievements {
                    content.push_str(&format!("\n  - {}", achievement));
                }
            }
        }
        if !p.interests.is_empty() {
            content.push_str(&format!(
                "\n\nI'm passionate about {}.",
                p.interests.join(", ")
            ));
        }
        (
            content,
            vec![
                QuickReply::new("Skills", "What are your technical skills?", Icon::Zap),
                QuickReply::new("Projects", "Show me your projects", Icon::Briefcase),
                contact_reply(),
            ],
        )
    }

    fn unknown(
        &self,
        before: &ConversationContext,
        after: &ConversationContext,
    ) -> (String, Vec<QuickReply>) {
        let content = if after.is_first_question() {
            format!(
                "I'm here to help you learn about my experience as a {}. You can ask about my skills, \
projects, or how to get in touch. What interests you?",
                self.profile.role
            )
        } else if let Some(topic) = before.previous_topic() {
            format!(
                "I'm not sure I understood that. We were discussing {}. Would you like to know more \
about that or something else?",
                topic
            )
        } else {
            "I can tell you about my skills, projects, experience, or how to get in touch. \
What would you like to know?"
                .to_string()
        };
        (content, menu_quick_replies())
    }

    /// Quick replies for a reply produced by the remote completion service,
    /// derived from keywords in its text. Never empty.
    pub fn suggest_from_completion(&self, text: &str) -> Vec<QuickReply> {
        let text = text.to_lowercase();
        let mut options = Vec::new();

        if text.contains("frontend") || text.contains("react") {
            options.push(backend_reply());
        }
        if text.contains("backend") || text.contains("node") {
            options.push(frontend_reply());
        }
        if text.contains("project") {
            options.push(QuickReply::new(
                "View All Projects",
                "Show me your projects",
                Icon::Briefcase,
            ));
        }
        if !text.contains("email") && !text.contains("contact") {
            options.push(contact_reply());
        }

        if options.is_empty() {
            options = vec![skills_reply(), projects_reply()];
        }
        options
    }

    /// Degrades a failed remote turn to a local reply.
    ///
    /// A configuration error becomes a visible error message; any other
    /// failure falls back to the locally composed reply. Both carry a
    /// "Start Over" option.
    pub fn degraded(&self, error: &AppError, local: ComposedReply) -> ComposedReply {
        let (content, mut quick_replies) = if error.is_config() {
            (
                format!(
                    "⚠️ The assistant service is not configured ({}). I can still answer questions \
about my skills, projects, and contact details.",
                    error
                ),
                menu_quick_replies(),
            )
        } else {
            (
                format!(
                    "_I couldn't reach the assistant service just now, so here's a quick answer \
instead._\n\n{}",
                    local.content
                ),
                local.quick_replies,
            )
        };

        let start_over = start_over_reply();
        if !quick_replies.iter().any(|q| q.value == start_over.value) {
            quick_replies.push(start_over);
        }

        ComposedReply {
            content,
            quick_replies,
            context: local.context,
        }
    }
}

fn project_detail(project: &Project) -> String {
    format!(
        "**{}**\n\n{}\n\n\
**Tech Stack:** {}\n\
**Key Achievement:** {}\n\n\
You can view the [live site]({}) or check out the [source code]({}).",
        project.name,
        project.description,
        project.tech_stack.join(", "),
        project.challenges_solved,
        project.live_url,
        project.code_url
    )
}
