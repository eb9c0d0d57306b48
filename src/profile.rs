//! Portfolio content.
//!
//! The same data renders the page sections and the assistant's system
//! preamble, so the assistant can only speak to what the page shows.

use once_cell::sync::Lazy;
use std::fmt::Write;

#[derive(Clone, Debug, PartialEq)]
pub struct SkillGroup {
    pub label: &'static str,
    pub items: &'static [&'static str],
}

#[derive(Clone, Debug, PartialEq)]
pub struct Education {
    pub title: &'static str,
    pub institution: &'static str,
    pub period: &'static str,
    pub details: &'static [&'static str],
}

#[derive(Clone, Debug, PartialEq)]
pub struct Project {
    pub name: &'static str,
    pub period: Option<&'static str>,
    pub stack: &'static [&'static str],
    pub highlights: &'static [&'static str],
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContactLink {
    pub label: &'static str,
    pub value: &'static str,
    pub href: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub name: &'static str,
    pub headline: &'static str,
    pub about: &'static str,
    pub skills: Vec<SkillGroup>,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub certifications: Vec<&'static str>,
    pub goals: Vec<&'static str>,
    pub contact: Vec<ContactLink>,
}

pub static PROFILE: Lazy<Profile> = Lazy::new(Profile::shreyaas);

impl Profile {
    fn shreyaas() -> Self {
        Self {
            name: "Shreyaas Gupta",
            headline: "Full Stack Developer | AI Enthusiast",
            about: "Second-year B.Tech Computer Science student at SRM Institute of Science and \
                    Technology, Chennai, and a full stack developer who enjoys building scalable \
                    backend systems and AI powered applications. Seeking a Summer 2026 software \
                    internship at a tech startup.",
            skills: vec![
                SkillGroup {
                    label: "Languages",
                    items: &["C", "C++", "Java", "Python", "TypeScript"],
                },
                SkillGroup {
                    label: "Frameworks",
                    items: &["React", "Spring Boot", "FastAPI"],
                },
                SkillGroup {
                    label: "Tools",
                    items: &["Git", "Linux", "VS Code", "Jupyter Notebook"],
                },
                SkillGroup {
                    label: "Core",
                    items: &[
                        "Data Structures",
                        "Algorithms",
                        "System Simulation",
                        "Performance Analysis",
                    ],
                },
                SkillGroup {
                    label: "Web & DB",
                    items: &["HTML", "CSS", "JavaScript", "MySQL"],
                },
            ],
            education: vec![
                Education {
                    title: "B.Tech in Computer Science and Engineering",
                    institution: "SRM Institute of Science and Technology, Chennai",
                    period: "2024 – 2028",
                    details: &[
                        "CGPA: 8.8/10",
                        "Expected graduation: May 2028",
                        "Currently in second year",
                    ],
                },
                Education {
                    title: "Non-Medical (Class XII)",
                    institution: "ASAN Memorial Senior Secondary School, Chennai",
                    period: "2022 – 2024",
                    details: &[],
                },
            ],
            projects: vec![
                Project {
                    name: "Speech Emotion Classification System",
                    period: Some("Jan 2026 – Present"),
                    stack: &["Python", "Audio Processing"],
                    highlights: &[
                        "Built an end-to-end audio data pipeline for speech emotion recognition",
                        "Extracted MFCC features and created machine-learning ready datasets",
                        "Performed exploratory data analysis on class balance and signal patterns",
                    ],
                },
                Project {
                    name: "CacheLab – CPU Cache Simulator",
                    period: None,
                    stack: &["C++"],
                    highlights: &[
                        "Implemented FIFO, LRU, and LFU cache replacement algorithms",
                        "Simulated memory access patterns and measured hit and miss rates",
                        "Visualized cache performance using dynamic graphs",
                    ],
                },
                Project {
                    name: "Traffic Routing Engine",
                    period: None,
                    stack: &["Java"],
                    highlights: &[
                        "Graph-based routing system using BFS, DFS, and Dijkstra",
                        "Simulated traffic flow and computed optimal routes under varying load",
                        "Benchmarked algorithm performance across different scenarios",
                    ],
                },
                Project {
                    name: "AI Portfolio",
                    period: None,
                    stack: &["Rust", "Dioxus", "Groq"],
                    highlights: &[
                        "Full-stack personal developer portfolio with an integrated AI assistant",
                        "Used for internship and startup applications",
                    ],
                },
            ],
            certifications: vec![
                "NPTEL: Programming in Java (91%)",
                "NPTEL: OOP Fundamentals (81%)",
                "Udemy: Java Beginner to Master",
            ],
            goals: vec![
                "Seeking a Summer 2026 software internship at a tech startup",
                "Strong interest in system simulators, algorithmic engines, data pipelines, and web applications",
            ],
            contact: vec![
                ContactLink {
                    label: "Email",
                    value: "shreyaas@example.com",
                    href: "mailto:shreyaas@example.com",
                },
                ContactLink {
                    label: "GitHub",
                    value: "github.com/itsShreyaas",
                    href: "https://github.com/itsShreyaas",
                },
            ],
        }
    }

    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(self.name)
    }

    /// Opening assistant message for a fresh conversation.
    pub fn greeting(&self) -> String {
        format!("Hi, I'm {} AI. Ask anything about me.", self.first_name())
    }

    /// System preamble sent ahead of every transcript.
    pub fn system_prompt(&self) -> String {
        let mut prompt = String::new();
        let first = self.first_name();

        let _ = writeln!(
            prompt,
            "You are {first}'s personal portfolio assistant, an AI representing {}. \
             Answer questions accurately based only on the information below. \
             Be friendly, concise, and professional.",
            self.name
        );

        let _ = writeln!(prompt, "\nABOUT {first}:\n{}", self.about);
        let _ = writeln!(prompt, "Headline: {}", self.headline);

        prompt.push_str("\nEDUCATION:\n");
        for (i, edu) in self.education.iter().enumerate() {
            let _ = writeln!(prompt, "{}. {}", i + 1, edu.title);
            let _ = writeln!(prompt, "   - Institution: {}", edu.institution);
            let _ = writeln!(prompt, "   - Duration: {}", edu.period);
            for detail in edu.details {
                let _ = writeln!(prompt, "   - {detail}");
            }
        }

        prompt.push_str("\nTECHNICAL SKILLS:\n");
        for group in &self.skills {
            let _ = writeln!(prompt, "- {}: {}", group.label, group.items.join(", "));
        }

        prompt.push_str("\nPROJECTS:\n");
        for (i, project) in self.projects.iter().enumerate() {
            match project.period {
                Some(period) => {
                    let _ = writeln!(prompt, "{}. {} ({period})", i + 1, project.name);
                }
                None => {
                    let _ = writeln!(prompt, "{}. {}", i + 1, project.name);
                }
            }
            if !project.stack.is_empty() {
                let _ = writeln!(prompt, "   - Tech: {}", project.stack.join(", "));
            }
            for line in project.highlights {
                let _ = writeln!(prompt, "   - {line}");
            }
        }

        prompt.push_str("\nCERTIFICATIONS:\n");
        for cert in &self.certifications {
            let _ = writeln!(prompt, "- {cert}");
        }

        prompt.push_str("\nGOALS:\n");
        for goal in &self.goals {
            let _ = writeln!(prompt, "- {goal}");
        }

        prompt.push_str("\nCONTACT:\n");
        for link in &self.contact {
            let _ = writeln!(prompt, "- {}: {}", link.label, link.value);
        }

        let _ = write!(
            prompt,
            "\nIf asked something not covered above, politely say you only have information \
             from {first}'s portfolio. Do not make up or guess any information."
        );
        prompt
    }
}
