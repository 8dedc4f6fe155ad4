// Prompt templates for the relay endpoints.
// Placeholders are filled with `llm_client::prompts::fill`.

/// Brand-safety prompt. Replace: {brand_name}, {country}, {json_only}
pub const BRAND_CHECK_PROMPT_TEMPLATE: &str = r#"Analyze the brand name "{brand_name}" for the target market "{country}".
Focus on: cultural sensitivity, linguistic meaning, pronunciation issues, and slang.

Return a JSON object with this exact structure:
{
  "score": number 0-100, where 100 is perfect/safe,
  "status": "safe" | "warning" | "risk",
  "meaning": "brief explanation of the meaning in the local language",
  "pronunciation": "brief comment on ease of pronunciation",
  "suggestion": "specific advice or alternative idea"
}

{json_only}"#;

/// Image audit prompt. Replace: {industry}, {persona}, {country}, {json_only}
pub const IMAGE_AUDIT_PROMPT_TEMPLATE: &str = r##"You are a strict Senior UX/UI Auditor specialized in Cross-Cultural Design.
Audit the attached image for the "{industry}" industry, targeting "{persona}" in "{country}".

VALIDATION STEP:
1. Analyze the image visually.
2. If the image is NOT a digital user interface (a photo of an animal, a landscape, a blank screen), return score 0.
3. If it is a UI, grade it strictly.

GRADING RUBRIC (be harsh):
- 0-40: poor UX, broken layout, wrong culture.
- 41-70: average, usable but generic.
- 71-85: good professional standard.
- 86-100: world-class, perfect localization.

Report legal or compliance problems (privacy, cookie consent, offensive or taboo content,
accessibility, misleading pricing) as "error" details. Do not report padding, margin,
spacing or kerning nitpicks unless they break the layout.

OUTPUT FORMAT:
{
  "score": number 0-100,
  "quote": "short, critical summary",
  "metrics": {
    "legibility": "High" | "Medium" | "Low",
    "issues": number,
    "safety": "Pass" | "Fail",
    "context": "{industry}"
  },
  "details": [
    { "id": 1, "type": "error", "title": "Critical Issue", "desc": "Explain clearly" },
    { "id": 2, "type": "suggestion", "title": "Improvement", "desc": "..." }
  ],
  "visualIssues": [
    { "id": "v1", "title": "Contrast", "description": "...", "recommendation": "...",
      "severity": "critical" | "warning", "x": 10, "y": 20, "w": 30, "h": 10 }
  ],
  "benchmark": {
    "competitors": ["Global Standard", "Local Leader"],
    "marketAvgScore": 75,
    "radarData": [50, 60, 70, 80, 90],
    "competitorName": "Top Local Leader",
    "competitorScore": 88,
    "comparison": [
      { "aspect": "Visual Hierarchy", "us": "Cluttered", "them": "Clean", "notes": "They use whitespace better" }
    ]
  },
  "localizerKit": {
    "adaptivePalette": [
      { "hex": "#FF0000", "name": "Lucky Red", "originalRef": "#000000", "reason": "Better for the market" }
    ],
    "fonts": { "heading": "Noto Sans", "body": "Roboto" },
    "cssVariable": ":root { --primary: #FF0000; }"
  }
}

Coordinates x, y, w, h are percentages of the image width and height.
radarData always has exactly five numbers.

{json_only}"##;

/// Content audit prompt.
/// Replace: {country}, {keyword}, {title}, {description}, {h1}, {body_text}, {json_only}
pub const CONTENT_AUDIT_PROMPT_TEMPLATE: &str = r#"Act as an expert Cultural SEO Audit AI.
Analyze the following website content for the target audience in "{country}".
Target keyword: "{keyword}"

Website data (scraped):
- Title: {title}
- Description: {description}
- H1: {h1}
- Content snippet: {body_text}

Analyze based on:
1. Cultural resonance: does the tone and language fit {country}?
2. SEO structure.
3. Risk detection: offensive or taboo topics in {country}.

Return JSON:
{
  "overallScore": number 0-100,
  "culturalFitScore": number 0-100,
  "sentiment": "Positive" | "Neutral" | "Negative",
  "summary": "short executive summary",
  "goodPoints": ["point 1", "point 2"],
  "improvements": ["fix 1", "fix 2"],
  "culturalInsights": ["insight specific to {country}"]
}

{json_only}"#;
