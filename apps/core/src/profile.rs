//! Portfolio profile loading.
//!
//! The profile is read once at startup, either from a JSON file or from the
//! built-in sample, and validated before anything else sees it.

use crate::error::AppError;
use crate::models::{Experience, PortfolioProfile, Project, SkillSet};
use std::fs;
use std::path::Path;
use tracing::info;
use validator::Validate;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for PortfolioProfile {
    fn default() -> Self {
        Self {
            name: "Alex Morgan".to_string(),
            role: "Software Engineer / Web Developer".to_string(),
            location: "Pune, Maharashtra, India".to_string(),
            email: "alex.morgan@example.com".to_string(),
            linkedin: "www.linkedin.com/in/alex-morgan".to_string(),
            github: "github.com/alexmorgan".to_string(),
            website: "alexmorgan.dev".to_string(),
            skills: SkillSet {
                frontend: strings(&["React.js", "Next.js", "JavaScript", "TypeScript", "Tailwind CSS"]),
                backend: strings(&["Node.js", "MongoDB", "PostgreSQL"]),
                devops: strings(&["Git"]),
            },
            projects: vec![
                Project {
                    name: "Portfolio Website".to_string(),
                    description: "A modern web portfolio showcasing skills and projects with interactive features".to_string(),
                    tech_stack: strings(&["Next.js", "TypeScript", "Tailwind CSS"]),
                    live_url: "https://alexmorgan.dev".to_string(),
                    code_url: "https://github.com/alexmorgan/portfolio".to_string(),
                    challenges_solved: "Implemented an AI-like chat interface that helps visitors navigate the portfolio and learn about my skills and experience.".to_string(),
                    intent_key: Some("portfolio".to_string()),
                },
                Project {
                    name: "Project Dashboard".to_string(),
                    description: "A comprehensive dashboard for tracking project metrics and performance".to_string(),
                    tech_stack: strings(&["React.js", "Node.js", "MongoDB"]),
                    live_url: "https://dashboard.example.com".to_string(),
                    code_url: "https://github.com/alexmorgan/dashboard".to_string(),
                    challenges_solved: "Created responsive visualizations that work across all devices while maintaining performance.".to_string(),
                    intent_key: Some("dashboard".to_string()),
                },
                Project {
                    name: "Task Management App".to_string(),
                    description: "A cross-platform task management solution with real-time updates".to_string(),
                    tech_stack: strings(&["React.js", "Node.js", "PostgreSQL"]),
                    live_url: "https://tasks.example.com".to_string(),
                    code_url: "https://github.com/alexmorgan/tasks".to_string(),
                    challenges_solved: "Built a robust offline-first architecture that syncs when connectivity is restored.".to_string(),
                    intent_key: Some("taskapp".to_string()),
                },
            ],
            experience: vec![Experience {
                company: "Dynamic Tech Company".to_string(),
                role: "Full Stack Developer".to_string(),
                period: "2023-Present".to_string(),
                achievements: strings(&[
                    "Developed and maintained complex web applications",
                    "Reduced API response time by 40%",
                    "Collaborated with team members to deliver high-quality solutions",
                ]),
            }],
            about: "Self-motivated and detail-oriented Full Stack Software Developer with over three years of experience in web development. Proficient in React.js and Node.js, with a strong foundation in both frontend and backend technologies.".to_string(),
            interests: strings(&[
                "Open source contribution",
                "Web development",
                "Continuous learning",
                "Staying current with industry trends",
            ]),
        }
    }
}

impl PortfolioProfile {
    /// Reads and validates a profile from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let raw = fs::read_to_string(&path)?;
        let profile: PortfolioProfile = serde_json::from_str(&raw)?;
        profile.validate_all()?;
        info!(
            "Loaded profile for {} ({} projects) from {:?}",
            profile.name,
            profile.projects.len(),
            path.as_ref()
        );
        Ok(profile)
    }

    /// Loads from `path` when given, otherwise returns the built-in sample.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(p) => Self::load(p),
            None => {
                info!("No profile path configured, using the built-in sample profile");
                Ok(Self::default())
            }
        }
    }

    /// Validates the profile and every nested project and experience record.
    pub fn validate_all(&self) -> Result<(), AppError> {
        self.validate()?;
        for project in &self.projects {
            project.validate()?;
        }
        for job in &self.experience {
            job.validate()?;
        }
        if self.projects.is_empty() {
            return Err(AppError::Validation(
                "profile must list at least one project".to_string(),
            ));
        }
        Ok(())
    }

    /// Finds the project a classifier subtopic points at.
    pub fn project_for_key(&self, key: &str) -> Option<&Project> {
        self.projects
            .iter()
            .find(|p| p.intent_key.as_deref() == Some(key))
    }

    /// System prompt sent ahead of the transcript in remote completion mode.
    pub fn system_prompt(&self) -> String {
        let projects = self
            .projects
            .iter()
            .map(|p| format!("- {}: {} ({})", p.name, p.description, p.tech_stack.join(", ")))
            .collect::<Vec<_>>()
            .join("\n");
        let experience = self
            .experience
            .iter()
            .map(|e| format!("- {} at {} ({})", e.role, e.company, e.period))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "You are the assistant on {name}'s portfolio website. Answer visitor questions about {name} \
in the first person, concisely, using markdown.\n\n\
Role: {role}\nLocation: {location}\nAbout: {about}\n\n\
Frontend: {frontend}\nBackend: {backend}\nDevOps: {devops}\n\n\
Projects:\n{projects}\n\nExperience:\n{experience}\n\n\
Contact: email {email}, LinkedIn {linkedin}, GitHub {github}, website {website}",
            name = self.name,
            role = self.role,
            location = self.location,
            about = self.about,
            frontend = self.skills.frontend.join(", "),
            backend = self.skills.backend.join(", "),
            devops = self.skills.devops.join(", "),
            projects = projects,
            experience = experience,
            email = self.email,
            linkedin = self.linkedin,
            github = self.github,
            website = self.website,
        )
    }
}
