use crate::profile::{PROFILE, Profile, Project};
use dioxus::prelude::*;

/// Page sections in display order: (anchor id, nav label).
pub const SECTIONS: &[(&str, &str)] = &[
    ("hero", "Home"),
    ("about", "About"),
    ("skills", "Skills"),
    ("education", "Education"),
    ("experience", "Experience"),
    ("contact", "Contact"),
];

fn profile() -> &'static Profile {
    &PROFILE
}

#[component]
pub fn NavBar() -> Element {
    rsx! {
        nav { class: "nav",
            span { class: "nav-brand", "{profile().name}" }
            div { class: "nav-links",
                for (id, label) in SECTIONS.iter().skip(1) {
                    a { class: "nav-link", href: "#{id}", "{label}" }
                }
            }
        }
    }
}

#[component]
pub fn Hero() -> Element {
    let profile = profile();
    rsx! {
        section { id: "hero", class: "section hero",
            h1 { class: "hero-name", "{profile.name}" }
            p { class: "hero-headline", "{profile.headline}" }
        }
    }
}

#[component]
pub fn About() -> Element {
    rsx! {
        section { id: "about", class: "section",
            h2 { class: "section-title", "About Me" }
            p { class: "section-body", "{profile().about}" }
        }
    }
}

#[component]
pub fn Skills() -> Element {
    rsx! {
        section { id: "skills", class: "section alt",
            h2 { class: "section-title", "Skills" }
            div { class: "card-grid",
                for group in profile().skills.iter() {
                    div { class: "card",
                        h3 { "{group.label}" }
                        div { class: "pill-row",
                            for item in group.items.iter() {
                                span { class: "pill", "{item}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn EducationSection() -> Element {
    rsx! {
        section { id: "education", class: "section",
            h2 { class: "section-title", "Education" }
            for edu in profile().education.iter() {
                div { class: "timeline-entry",
                    h3 { "{edu.title}" }
                    p { class: "text-muted", "{edu.institution} · {edu.period}" }
                    if !edu.details.is_empty() {
                        ul {
                            for detail in edu.details.iter() {
                                li { "{detail}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn Experience() -> Element {
    let profile = profile();
    rsx! {
        section { id: "experience", class: "section alt",
            h2 { class: "section-title", "Projects & Experience" }
            div { class: "card-grid",
                for project in profile.projects.iter() {
                    ProjectCard { project }
                }
            }
            if !profile.certifications.is_empty() {
                h3 { class: "subsection-title", "Certifications" }
                ul {
                    for cert in profile.certifications.iter() {
                        li { "{cert}" }
                    }
                }
            }
        }
    }
}

#[component]
fn ProjectCard(project: &'static Project) -> Element {
    let stack = project.stack.join(", ");
    rsx! {
        div { class: "card",
            h3 { "{project.name}" }
            if let Some(period) = project.period {
                p { class: "text-muted", "{period}" }
            }
            ul {
                for line in project.highlights.iter() {
                    li { "{line}" }
                }
            }
            p { b { "Tech: " } "{stack}" }
        }
    }
}

#[component]
pub fn Contact() -> Element {
    rsx! {
        section { id: "contact", class: "section",
            h2 { class: "section-title", "Contact" }
            for link in profile().contact.iter() {
                p {
                    "{link.label}: "
                    a { href: "{link.href}", "{link.value}" }
                }
            }
        }
    }
}
