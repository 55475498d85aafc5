// tests/pipeline.rs
use resume_pipeline::core::date_range::{decode, encode};
use resume_pipeline::core::normalizer::{canonical_to_structured, structured_to_canonical};
use resume_pipeline::core::skills::categorize;
use resume_pipeline::core::{detect_format, normalize_analysis, structure_markup, ResumeFormat};
use resume_pipeline::types::structured::SkillCategory;
use resume_pipeline::{CanonicalResume, TemplateId, TemplateRegistry};
use serde_json::{json, Value};

fn canonical_fixture() -> Value {
    json!({
        "name": "Margaret Hamilton",
        "title": "Software Engineer",
        "contact": {
            "phone": "+1 555 0199",
            "email": "margaret@apollo.dev",
            "location": "Cambridge, MA, USA",
            "github": "github.com/mhamilton"
        },
        "summary": "Flight software lead Apollo guidance computer Coined software engineering",
        "summaryHeadline": "Flight software lead",
        "summaryHighlights": ["Apollo guidance computer", "Coined software engineering"],
        "experience": [
            {
                "role": "Director",
                "company": "MIT Instrumentation Lab",
                "location": "Cambridge, MA",
                "duration": "Jan 1965 - Dec 1976",
                "details": ["Ran the software division"]
            },
            {
                "role": "Founder",
                "company": "Hamilton Technologies",
                "duration": "Mar 1986 - Present",
                "details": []
            }
        ],
        "projects": [
            {"title": "Apollo 11", "link": "https://example.org/apollo", "details": ["Priority scheduling"]}
        ],
        "education": [
            {"degree": "BA Mathematics", "university": "Earlham College", "duration": "Sep 1954 - Jun 1958", "cgpa": "3.9"}
        ],
        "skills": {
            "backend": ["Assembly", "HAL/S"],
            "tools": ["Core rope memory"],
            "soft_skills": ["Leadership"]
        },
        "certifications": ["NASA Exceptional Space Act Award"],
        "achievements": ["Presidential Medal of Freedom"]
    })
}

#[test]
fn canonical_round_trip_preserves_defined_fields() {
    let original: CanonicalResume =
        serde_json::from_value(canonical_fixture()).expect("fixture decodes");
    let restored = structured_to_canonical(&canonical_to_structured(&original));
    assert_eq!(restored, original);
}

fn handwritten_fixture() -> Value {
    json!({
        "name": "Priya Raman",
        "title": "Platform Engineer",
        "contact": {
            "email": "priya@example.com",
            "phone": "+91 98450 00000",
            "location": "Bengaluru, Karnataka, India",
            "linkedin": "linkedin.com/in/priya"
        },
        "summary": "Seasoned engineer with ten years of experience.",
        "summaryHighlights": [],
        "experience": [
            {"role": "Intern", "company": "Infosys", "duration": "Summer 2019", "details": ["Wrote scripts"]},
            {"role": "Engineer", "company": "Flipkart", "location": "Bengaluru", "duration": "2016 - 2018", "details": []},
            {"role": "Contractor", "company": "Stealth", "duration": "Jan 2020 - TBD", "details": ["Migrations"]},
            {"role": "Staff Engineer", "company": "Razorpay", "duration": "Sep 2021 - Present", "details": ["Led SRE"]}
        ],
        "projects": [{"title": "kube-audit", "details": []}],
        "education": [{"degree": "BTech", "university": "NIT Trichy", "duration": "May 2014"}],
        "skills": {"database": ["Postgres"], "tools": ["Terraform", "Kubernetes"]},
        "achievements": []
    })
}

#[test]
fn handwritten_resume_round_trips_including_free_text_durations() {
    let original: CanonicalResume =
        serde_json::from_value(handwritten_fixture()).expect("fixture decodes");
    let restored = structured_to_canonical(&canonical_to_structured(&original));
    assert_eq!(restored, original);
}

#[test]
fn summary_beside_highlights_is_the_only_summary_loss() {
    let mut raw = handwritten_fixture();
    raw["summaryHeadline"] = json!("Reliability first");
    raw["summaryHighlights"] = json!(["Led team", "Shipped product"]);
    let original: CanonicalResume = serde_json::from_value(raw).expect("decodes");

    let restored = structured_to_canonical(&canonical_to_structured(&original));
    assert_eq!(restored.summary, "Reliability first Led team Shipped product");

    let mut expected = original.clone();
    expected.summary = restored.summary.clone();
    assert_eq!(restored, expected);
}

#[test]
fn structured_with_name_and_email_is_detected() {
    let raw = json!({
        "basics": {"full_name": "Alan Kay", "contact": {"email": "alan@parc.com"}},
        "experience": []
    });
    let document = detect_format(&raw).expect("detects");
    assert_eq!(document.format(), ResumeFormat::Structured);
}

#[test]
fn date_range_decode_inverts_encode() {
    for (start, end) in [("2020-03", "2022-11"), ("1999-12", "2000-01"), ("2018-01", "2018-01")] {
        let range = decode(&encode(Some(start), Some(end), false));
        assert_eq!(range.start_date.as_deref(), Some(start));
        assert_eq!(range.end_date.as_deref(), Some(end));
        assert_eq!(range.is_current, Some(false));
    }
}

#[test]
fn present_marks_range_current() {
    let range = decode("Jan 2020 - Present");
    assert_eq!(range.start_date.as_deref(), Some("2020-01"));
    assert_eq!(range.end_date, None);
    assert_eq!(range.is_current, Some(true));
}

#[test]
fn cloud_category_lands_in_tools() {
    let skills = categorize(&[
        SkillCategory {
            name: "Cloud Platforms".to_string(),
            items: vec!["AWS".to_string()],
        },
        SkillCategory {
            name: "Frontend".to_string(),
            items: vec!["React".to_string()],
        },
    ]);
    assert_eq!(skills.tools, Some(vec!["AWS".to_string()]));
    assert_eq!(skills.frontend, Some(vec!["React".to_string()]));
    assert_eq!(skills.backend, None);
}

#[test]
fn analysis_defaults_fill_untouched_fields() {
    let result = normalize_analysis(&json!({"resumeScore": 88, "improvements": ["x"]}))
        .expect("object payload");
    assert_eq!(
        serde_json::to_value(result).expect("serializes"),
        json!({
            "score": 88.0,
            "matchScore": 70.0,
            "strengths": [],
            "weaknesses": ["x"],
            "suggestions": [],
            "keywords": [],
            "missingKeywords": [],
            "recommendedKeywords": []
        })
    );
}

#[test]
fn experience_heading_becomes_dated_row() {
    let markup = structure_markup("<h3>Experience</h3>\n<h4>Engineer (2020-2022)</h4>\n<p>Built things</p>");
    let section = markup.section("Experience").expect("experience section");
    let row = section.rows().next().expect("one row");
    assert_eq!(row.primary, "Engineer");
    assert_eq!(row.date.as_deref(), Some("2020-2022"));
}

#[test]
fn empty_certifications_never_render() {
    let mut raw = canonical_fixture();
    raw["certifications"] = json!([]);
    let resume: CanonicalResume = serde_json::from_value(raw).expect("decodes");
    let registry = TemplateRegistry::new();

    for template in TemplateId::ALL {
        let document = registry.render(template.as_str(), &resume);
        assert_eq!(document.template, template);
        assert!(
            !document.section_headings().contains(&"Certifications"),
            "{} rendered an empty Certifications section",
            template
        );
        assert!(!document.to_html().contains("Certifications"));
    }
}

#[test]
fn unknown_template_renders_modern() {
    let resume: CanonicalResume =
        serde_json::from_value(canonical_fixture()).expect("fixture decodes");
    let document = TemplateRegistry::new().render("holographic", &resume);
    assert_eq!(document.template, TemplateId::Modern);
}
