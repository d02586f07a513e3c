//! services/api/src/web/page.rs
//!
//! The browser shell: one static page that drives the REST endpoints.

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Customizable Document Summarizer</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 860px; margin: 2rem auto; padding: 0 1rem; color: #222; }
  h1 { font-size: 1.6rem; }
  fieldset { border: 1px solid #ddd; border-radius: 6px; margin-bottom: 1rem; }
  label { display: block; margin: .6rem 0 .2rem; font-weight: 600; }
  pre { white-space: pre-wrap; background: #f6f6f6; padding: .8rem; border-radius: 4px; }
  .error { color: #b00020; white-space: pre-wrap; }
  .muted { color: #666; font-size: .9rem; }
  button { padding: .5rem 1.2rem; font-size: 1rem; }
</style>
</head>
<body>
<h1>Customizable Document Summarizer</h1>

<fieldset>
  <label for="file">Upload a document (.txt or .pdf)</label>
  <input id="file" type="file" accept=".txt,.pdf,text/plain,application/pdf">
  <p id="upload-error" class="error"></p>
</fieldset>

<fieldset>
  <label for="length">Summary length: <span id="length-value"></span> sentences</label>
  <input id="length" type="range" min="1" max="30" value="10">
  <label for="style">Summary style</label>
  <select id="style"></select>
  <label for="instructions">Additional instructions (optional)</label>
  <input id="instructions" type="text" style="width: 100%">
</fieldset>

<section id="document" hidden>
  <h2>Document Preview (first <span id="preview-lines">5</span> lines)</h2>
  <p id="document-meta" class="muted"></p>
  <pre id="preview"></pre>
  <details id="full-view">
    <summary>Show full document content</summary>
    <pre id="full-text"></pre>
  </details>
  <p><button id="summarize">Summarize</button></p>
</section>

<p id="summary-error" class="error"></p>
<section id="summary-section" hidden>
  <h2>Summary</h2>
  <pre id="summary"></pre>
</section>

<script>
const $ = (id) => document.getElementById(id);

async function call(method, path, body, headers) {
  const response = await fetch(path, { method, body, headers, credentials: "same-origin" });
  if (!response.ok) {
    throw new Error(await response.text() || response.statusText);
  }
  return response.status === 204 ? null : response.json();
}

async function ensureSession() {
  try {
    return await call("GET", "/session");
  } catch (_) {
    return await call("POST", "/sessions");
  }
}

function render(view) {
  const doc = view.document;
  $("document").hidden = !doc;
  if (doc) {
    $("preview").textContent = doc.preview;
    $("document-meta").textContent =
      (doc.file_name || "document") + " (" + doc.media_type + ", " + doc.line_count + " lines)";
    $("full-text").textContent = "";
    $("full-view").open = false;
  }
  if (view.parameters) {
    $("length").value = view.parameters.sentence_count;
    $("style").value = view.parameters.style;
    $("instructions").value = view.parameters.instructions;
    $("length-value").textContent = $("length").value;
  }
  $("summary-section").hidden = !view.summary;
  $("summary").textContent = view.summary ? view.summary.text : "";
}

async function init() {
  const options = await call("GET", "/summary-options");
  for (const style of options.styles) {
    const option = document.createElement("option");
    option.value = style;
    option.textContent = style;
    $("style").appendChild(option);
  }
  $("length").min = options.min_sentences;
  $("length").max = options.max_sentences;
  $("length").value = options.default_sentences;
  $("preview-lines").textContent = options.preview_lines;
  $("length-value").textContent = $("length").value;
  render(await ensureSession());
}

$("length").addEventListener("input", () => {
  $("length-value").textContent = $("length").value;
});

$("file").addEventListener("change", async () => {
  const file = $("file").files[0];
  if (!file) return;
  $("upload-error").textContent = "";
  const form = new FormData();
  form.append("file", file);
  try {
    await ensureSession();
    await call("POST", "/session/document", form);
    render(await call("GET", "/session"));
  } catch (e) {
    $("upload-error").textContent = e.message;
  }
});

$("full-view").addEventListener("toggle", async () => {
  if (!$("full-view").open || $("full-text").textContent) return;
  try {
    const full = await call("GET", "/session/document");
    $("full-text").textContent = full.text;
  } catch (e) {
    $("full-text").textContent = e.message;
  }
});

$("summarize").addEventListener("click", async () => {
  $("summary-error").textContent = "";
  $("summarize").disabled = true;
  $("summarize").textContent = "Summarizing...";
  const payload = {
    sentence_count: Number($("length").value),
    style: $("style").value,
    instructions: $("instructions").value,
  };
  try {
    const summary = await call("POST", "/session/summary", JSON.stringify(payload),
      { "Content-Type": "application/json" });
    $("summary").textContent = summary.text;
    $("summary-section").hidden = false;
  } catch (e) {
    $("summary-error").textContent = e.message;
  } finally {
    $("summarize").disabled = false;
    $("summarize").textContent = "Summarize";
  }
});

init().catch((e) => { $("upload-error").textContent = e.message; });
</script>
</body>
</html>
"#;
