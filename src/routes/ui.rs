use axum::{response::Html, routing::get, Router};

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>PDF Digest - Combined Summaries</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 2rem; color: #1d1d1f; max-width: 720px; }
    h1 { margin-bottom: 0.5rem; }
    .card { border: 1px solid #ddd; padding: 1rem; border-radius: 8px; margin-bottom: 1rem; }
    label { display: block; margin-top: 0.75rem; font-weight: 600; }
    input[type=file] { width: 100%; padding: 0.5rem 0; }
    button { margin-top: 1rem; padding: 0.6rem 1rem; }
    #status { margin-top: 1rem; white-space: pre-wrap; }
  </style>
</head>
<body>
  <h1>PDF Digest</h1>
  <p>Upload four PDF documents and download one report with a summary of each.</p>

  <form id="summaryForm" class="card" action="/summarize" method="post" enctype="multipart/form-data">
    <label for="pdf1">Document 1</label>
    <input id="pdf1" name="pdf1" type="file" accept="application/pdf" required />
    <label for="pdf2">Document 2</label>
    <input id="pdf2" name="pdf2" type="file" accept="application/pdf" required />
    <label for="pdf3">Document 3</label>
    <input id="pdf3" name="pdf3" type="file" accept="application/pdf" required />
    <label for="pdf4">Document 4</label>
    <input id="pdf4" name="pdf4" type="file" accept="application/pdf" required />
    <button type="submit">Summarize</button>
    <div id="status"></div>
  </form>

  <script>
    const form = document.getElementById('summaryForm');
    const status = document.getElementById('status');

    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      status.textContent = 'Summarizing, this can take a while...';
      const res = await fetch('/summarize', { method: 'POST', body: new FormData(form) });
      if (!res.ok) {
        status.textContent = await res.text();
        return;
      }
      const blob = await res.blob();
      const link = document.createElement('a');
      link.href = URL.createObjectURL(blob);
      link.download = 'combined_summaries.pdf';
      link.click();
      URL.revokeObjectURL(link.href);
      status.textContent = 'Done.';
    });
  </script>
</body>
</html>"#)
}
