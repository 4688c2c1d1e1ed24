// Prompt constants for estimate analysis. Sent verbatim; the model is addressed in Japanese.

/// Follows the estimate image.
pub const ESTIMATE_CONTEXT: &str = "これは賃貸の初期費用見積もりです。";

/// Follows the listing-sheet image, when one was uploaded.
pub const DRAWING_CONTEXT: &str =
    "これは物件の募集図面です。礼金やフリーレントの条件を確認してください。";

/// Output contract. Always the last part of the request.
pub const OUTPUT_CONTRACT: &str = r#"
あなたは「賃貸契約のプロ」です。アップロードされた画像から、交渉可能な項目を見つけ出し、以下のJSON形式のみで出力してください。
余計なMarkdown記号（```jsonなど）は一切不要です。純粋なJSONテキストのみを返してください。

【出力フォーマット】
{
  "items": [
    {
      "name": "項目名（例：鍵交換代、害虫駆除費、仲介手数料）",
      "current": 現在の価格（数値のみ）,
      "target": 適正価格または交渉後の目標価格（数値のみ）,
      "reason": "なぜ安くできるかの具体的な理由（不動産業界の知識に基づいて、消費者有利な論理で）"
    }
  ]
}
"#;
