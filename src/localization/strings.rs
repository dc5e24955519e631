use std::collections::HashMap;

lazy_static::lazy_static! {
    pub static ref ENGLISH_STRINGS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();

        // Severities
        m.insert("severity_critical", "CRITICAL");
        m.insert("severity_serious", "SERIOUS");
        m.insert("severity_moderate", "MODERATE");
        m.insert("severity_minor", "MINOR");

        // Section headers
        m.insert("section_summary", "SUMMARY");
        m.insert("section_screen_reader", "SCREEN-READER EXPERIENCE");
        m.insert("section_issues", "ISSUES");
        m.insert("section_suggestions", "SUGGESTIONS");

        // Report
        m.insert("report_header", "WCAG ACCESSIBILITY REPORT");
        m.insert("report_standard", "Standard");
        m.insert("report_model", "Model");
        m.insert("report_pass", "PASS: no issues found");
        m.insert("report_fail", "FAIL: {count} issue(s) found");
        m.insert("report_no_issues", "No issues found.");
        m.insert("report_not_provided", "Not provided by the model.");
        m.insert("report_criterion", "WCAG");
        m.insert("report_fix", "Suggested fix");
        m.insert("code_start", "--- Code Start ---");
        m.insert("code_end", "--- Code End ---");

        // Progress
        m.insert("progress_start", "Starting WCAG analysis...");
        m.insert("progress_connecting", "Connecting to the model server...");
        m.insert("progress_done", "Analysis complete.");

        // Connection checks
        m.insert("connection_ok", "Connection successful: the model server at {url} is reachable.");
        m.insert("connection_failed", "Connection failed: the model server at {url} is not reachable.");
        m.insert("models_header", "Available models");
        m.insert("models_none", "The server has no models installed. Pull one with `ollama pull {model}`.");
        m.insert("model_selected_missing", "The configured model '{model}' is not installed on the server.");

        // Failures
        m.insert("failure_title", "ANALYSIS ERROR");
        m.insert("failure_no_element", "No element information is available. Move focus to an element that has a name or role and try again.");
        m.insert("failure_invalid_config", "Invalid settings: {detail}. Correct the setting and try again.");
        m.insert("failure_connection", "Cannot reach the model server at {url}. Start the server (for example `ollama serve`) or check the server URL in the settings.");
        m.insert("failure_model_not_found", "The model '{model}' is not available on the server. Pull it with `ollama pull {model}` or select an installed model.");
        m.insert("failure_timeout", "The model did not answer within {seconds} seconds. Increase the timeout or choose a smaller, faster model.");
        m.insert("failure_server", "The model server reported an error: {detail}. Check the server log and try again.");
        m.insert("failure_endpoint_missing", "The server answered 404 for the generate endpoint. Check that the server URL points at the Ollama root (for example http://localhost:11434), without an extra path.");
        m.insert("failure_parse_summary", "The model's answer did not contain a summary section. Try again, or choose a model that follows formatting instructions more closely.");
        m.insert("failure_parse_empty", "The model returned an empty answer. Try again, or choose a different model.");
        m.insert("failure_cancelled", "Analysis cancelled.");

        // Prompt
        m.insert("prompt_not_available", "not available");
        m.insert("prompt_none", "none");

        m
    };

    pub static ref TURKISH_STRINGS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();

        // Severities
        m.insert("severity_critical", "KRİTİK");
        m.insert("severity_serious", "CİDDİ");
        m.insert("severity_moderate", "ORTA");
        m.insert("severity_minor", "DÜŞÜK");

        // Section headers
        m.insert("section_summary", "ÖZET");
        m.insert("section_screen_reader", "EKRAN OKUYUCU DENEYİMİ");
        m.insert("section_issues", "SORUNLAR");
        m.insert("section_suggestions", "ÖNERİLER");

        // Report
        m.insert("report_header", "WCAG ERİŞİLEBİLİRLİK RAPORU");
        m.insert("report_standard", "Standart");
        m.insert("report_model", "Model");
        m.insert("report_pass", "BAŞARILI: sorun bulunamadı");
        m.insert("report_fail", "BAŞARISIZ: {count} sorun bulundu");
        m.insert("report_no_issues", "Sorun bulunamadı.");
        m.insert("report_not_provided", "Model tarafından belirtilmedi.");
        m.insert("report_criterion", "WCAG");
        m.insert("report_fix", "Önerilen düzeltme");
        m.insert("code_start", "--- Kod Başlangıcı ---");
        m.insert("code_end", "--- Kod Sonu ---");

        // Progress
        m.insert("progress_start", "WCAG analizi başlatılıyor...");
        m.insert("progress_connecting", "Model sunucusuna bağlanılıyor...");
        m.insert("progress_done", "Analiz tamamlandı.");

        // Connection checks
        m.insert("connection_ok", "Bağlantı başarılı: {url} adresindeki model sunucusuna erişilebiliyor.");
        m.insert("connection_failed", "Bağlantı başarısız: {url} adresindeki model sunucusuna erişilemiyor.");
        m.insert("models_header", "Kullanılabilir modeller");
        m.insert("models_none", "Sunucuda yüklü model yok. `ollama pull {model}` komutuyla bir model indirin.");
        m.insert("model_selected_missing", "Ayarlardaki '{model}' modeli sunucuda yüklü değil.");

        // Failures
        m.insert("failure_title", "ANALİZ HATASI");
        m.insert("failure_no_element", "Öğe bilgisi alınamadı. Adı veya rolü olan bir öğeye odaklanıp tekrar deneyin.");
        m.insert("failure_invalid_config", "Geçersiz ayar: {detail}. Ayarı düzeltip tekrar deneyin.");
        m.insert("failure_connection", "{url} adresindeki model sunucusuna ulaşılamıyor. Sunucuyu başlatın (örneğin `ollama serve`) veya ayarlardaki sunucu adresini kontrol edin.");
        m.insert("failure_model_not_found", "'{model}' modeli sunucuda bulunamadı. `ollama pull {model}` komutuyla indirin veya yüklü bir model seçin.");
        m.insert("failure_timeout", "Model {seconds} saniye içinde yanıt vermedi. Zaman aşımı süresini artırın veya daha küçük, hızlı bir model seçin.");
        m.insert("failure_server", "Model sunucusu bir hata bildirdi: {detail}. Sunucu günlüğünü kontrol edip tekrar deneyin.");
        m.insert("failure_endpoint_missing", "Sunucu üretim uç noktası için 404 döndürdü. Sunucu adresinin ek bir yol olmadan Ollama köküne (örneğin http://localhost:11434) işaret ettiğini kontrol edin.");
        m.insert("failure_parse_summary", "Modelin yanıtında özet bölümü yok. Tekrar deneyin veya biçim talimatlarına daha iyi uyan bir model seçin.");
        m.insert("failure_parse_empty", "Model boş bir yanıt döndürdü. Tekrar deneyin veya farklı bir model seçin.");
        m.insert("failure_cancelled", "Analiz iptal edildi.");

        // Prompt
        m.insert("prompt_not_available", "mevcut değil");
        m.insert("prompt_none", "yok");

        m
    };
}
