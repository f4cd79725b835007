//! The `sheelon init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    std::fs::create_dir_all("content")?;
    let example_path = std::path::Path::new("content/example.json");
    if example_path.exists() {
        println!("content/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_CONTENT)?;
        println!("Created content/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Edit content/example.json with your questions and categories");
    println!("  2. Run: sheelon validate --content content/example.json");
    println!("  3. Run: sheelon run --content content/example.json");

    Ok(())
}

const EXAMPLE_CONTENT: &str = r#"{
  "meta": {
    "id": "example",
    "title": "שאלון לדוגמה",
    "description": "שאלון קצר להתנסות במנוע"
  },
  "questions": [
    { "id": 1, "kind": "statement", "text": "אני נהנה מהעבודה שלי" },
    { "id": 2, "kind": "statement", "text": "אני מרגיש שמעריכים אותי" },
    { "id": 3, "kind": "statement", "text": "אני לומד דברים חדשים" },
    { "id": 4, "kind": "statement", "text": "יש לי אתגרים מעניינים" }
  ],
  "scoring": {
    "mode": "sum",
    "scale": { "min": 1, "max": 5 },
    "low_threshold": 8,
    "categories": [
      {
        "id": "satisfaction",
        "title": "שביעות רצון",
        "description": "הנאה והערכה בעבודה",
        "questions": [1, 2]
      },
      {
        "id": "growth",
        "title": "צמיחה",
        "description": "למידה ואתגר",
        "questions": [3, 4]
      }
    ]
  },
  "ui": {
    "question_of": "שאלה {current} מתוך {total}",
    "next": "הבא",
    "prev": "הקודם",
    "finish": "סיום",
    "back_to_intro": "חזרה להסבר"
  },
  "results": {
    "low_scores": "כל הציונים נמוכים",
    "low_scores_action": "אולי שווה לשוחח על זה עם מישהו שסומכים עליו",
    "worth_it": "שווה להשקיע בזה מחשבה"
  },
  "export": {
    "title": "תוצאות השאלון לדוגמה",
    "scores_heading": "ציונים לפי קטגוריה",
    "dominant_heading": "הקטגוריות הבולטות שלך"
  }
}
"#;
